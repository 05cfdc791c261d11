mod black_scholes_test;
mod exposure_test;
mod implied_vol_test;
mod smoothing_test;
