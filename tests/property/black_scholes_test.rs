use dealer_flow::model::{BsParams, OptionType};
use dealer_flow::pricing::{greeks, price};
use proptest::prelude::*;

proptest! {
    #[test]
    fn put_call_parity_holds(
        spot in 10.0f64..500.0,
        strike in 10.0f64..500.0,
        t in 0.01f64..3.0,
        vol in 0.02f64..2.0,
        r in 0.0f64..0.1,
        q in 0.0f64..0.05,
    ) {
        let call = BsParams::new(spot, strike, t, vol, r, OptionType::Call).with_dividend_yield(q);
        let put = BsParams::new(spot, strike, t, vol, r, OptionType::Put).with_dividend_yield(q);
        let call_price = price(&call);
        let put_price = price(&put);
        let forward_term = spot * (-q * t).exp() - strike * (-r * t).exp();
        prop_assert!((call_price - put_price - forward_term).abs() < 1e-6);
    }

    #[test]
    fn gamma_is_identical_for_calls_and_puts(
        spot in 10.0f64..500.0,
        strike in 10.0f64..500.0,
        t in 0.01f64..3.0,
        vol in 0.02f64..2.0,
        r in 0.0f64..0.1,
        q in 0.0f64..0.05,
    ) {
        let call = BsParams::new(spot, strike, t, vol, r, OptionType::Call).with_dividend_yield(q);
        let put = BsParams::new(spot, strike, t, vol, r, OptionType::Put).with_dividend_yield(q);
        let gc = greeks(&call);
        let gp = greeks(&put);
        prop_assert!((gc.gamma - gp.gamma).abs() < 1e-8);
        prop_assert!((gc.vega - gp.vega).abs() < 1e-8);
    }

    #[test]
    fn greeks_are_always_finite(
        spot in 10.0f64..2000.0,
        strike in 10.0f64..2000.0,
        t in 0.001f64..5.0,
        vol in 0.01f64..3.0,
        r in -0.02f64..0.15,
        q in 0.0f64..0.08,
    ) {
        let params = BsParams::new(spot, strike, t, vol, r, OptionType::Call).with_dividend_yield(q);
        let g = greeks(&params);
        prop_assert!(g.price.is_finite());
        prop_assert!(g.delta.is_finite());
        prop_assert!(g.gamma.is_finite());
        prop_assert!(g.charm.is_finite());
        prop_assert!(g.ultima.is_finite());
    }
}
