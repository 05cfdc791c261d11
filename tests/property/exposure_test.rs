use dealer_flow::exposure::calculate_gamma_vanna_charm_exposures;
use dealer_flow::model::{NormalizedOption, OptionChain, OptionType};
use dealer_flow::surfaces::{get_iv_surfaces, SmoothingModel, VolModel};
use proptest::prelude::*;

fn chain_with_open_interest(spot: f64, ois: &[(f64, f64)]) -> OptionChain {
    let expiration_timestamp = 30 * 86_400_000;
    let increment = 5.0;
    let base = (spot / increment).floor() * increment;
    let mut options = Vec::new();
    for (i, &(oi_c, oi_p)) in ois.iter().enumerate() {
        let strike = base + (i as f64 - ois.len() as f64 / 2.0) * increment;
        let call_price = (spot - strike).max(1.0);
        let put_price = (strike - spot).max(1.0);
        options.push(NormalizedOption {
            occ_symbol: format!("C{i}"),
            underlying: "N".into(),
            strike,
            expiration: "2025-12-19".into(),
            expiration_timestamp,
            option_type: OptionType::Call,
            bid: call_price - 0.05,
            bid_size: 1,
            ask: call_price + 0.05,
            ask_size: 1,
            mark: call_price,
            last: call_price,
            volume: 1,
            open_interest: oi_c,
            live_open_interest: None,
            implied_volatility: 0.20,
            timestamp: 0,
            greeks: None,
        });
        options.push(NormalizedOption {
            occ_symbol: format!("P{i}"),
            underlying: "N".into(),
            strike,
            expiration: "2025-12-19".into(),
            expiration_timestamp,
            option_type: OptionType::Put,
            bid: put_price - 0.05,
            bid_size: 1,
            ask: put_price + 0.05,
            ask_size: 1,
            mark: put_price,
            last: put_price,
            volume: 1,
            open_interest: oi_p,
            live_open_interest: None,
            implied_volatility: 0.22,
            timestamp: 0,
            greeks: None,
        });
    }
    OptionChain::new("N", spot, 0.03, 0.0, options)
}

proptest! {
    #[test]
    fn totals_equal_sum_of_components_and_strikes_sorted_by_net_descending(
        ois in prop::collection::vec((0.0f64..20_000.0, 0.0f64..20_000.0), 3..8),
    ) {
        let spot = 100.0;
        let chain = chain_with_open_interest(spot, &ois);
        let surfaces = get_iv_surfaces(VolModel::BlackScholes, SmoothingModel::None, &chain, 0);
        let rows = calculate_gamma_vanna_charm_exposures(&chain, &surfaces, Some(0));
        prop_assert_eq!(rows.len(), 1);
        let breakdown = &rows[0].canonical;

        prop_assert!((breakdown.total_net - (breakdown.total_gamma + breakdown.total_vanna + breakdown.total_charm)).abs() < 1e-4);
        prop_assert!(breakdown.strike_exposures.windows(2).all(|w| w[0].net_exposure >= w[1].net_exposure));

        for row in &breakdown.strike_exposures {
            prop_assert!(row.gamma_exposure.is_finite());
            prop_assert!(row.vanna_exposure.is_finite());
            prop_assert!(row.charm_exposure.is_finite());
        }
    }
}
