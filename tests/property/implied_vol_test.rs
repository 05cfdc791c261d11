use dealer_flow::model::{BsParams, OptionType};
use dealer_flow::pricing::{calculate_implied_volatility, price};
use proptest::prelude::*;

proptest! {
    #[test]
    fn round_trips_through_black_scholes_price(
        spot in 50.0f64..200.0,
        moneyness in 0.85f64..1.15,
        t in 0.05f64..2.0,
        vol in 0.08f64..1.2,
        r in 0.0f64..0.08,
        is_call in any::<bool>(),
    ) {
        let strike = spot * moneyness;
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let params = BsParams::new(spot, strike, t, vol, r, option_type);
        let option_price = price(&params);

        let recovered_pct = calculate_implied_volatility(option_price, spot, strike, r, 0.0, t, option_type);
        prop_assert!((recovered_pct / 100.0 - vol).abs() < 0.02);
    }

    #[test]
    fn degenerate_inputs_never_panic(
        spot in -10.0f64..500.0,
        strike in -10.0f64..500.0,
        t in -1.0f64..5.0,
        r in -0.1f64..0.2,
    ) {
        let iv = calculate_implied_volatility(5.0, spot, strike, r, 0.0, t, OptionType::Call);
        prop_assert!(iv.is_finite());
        prop_assert!(iv >= 0.0);
    }
}
