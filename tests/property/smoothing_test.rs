use proptest::prelude::*;

// The spline/convex-hull smoothing pipeline lives behind `pub(crate)`, so
// these properties drive it through the public surface that exercises it:
// a full IV-surface build with noisy total variance across strikes.
use dealer_flow::model::{NormalizedOption, OptionChain, OptionType};
use dealer_flow::surfaces::{get_iv_surfaces, SmoothingModel, VolModel};

fn chain_with_noisy_ivs(spot: f64, ivs: &[f64]) -> OptionChain {
    let increment = 5.0;
    let base = (spot / increment).floor() * increment;
    let options: Vec<NormalizedOption> = ivs
        .iter()
        .enumerate()
        .map(|(i, &iv)| {
            let strike = base + (i as f64 - ivs.len() as f64 / 2.0) * increment;
            let intrinsic = (spot - strike).max(1.0);
            NormalizedOption {
                occ_symbol: format!("N{i}"),
                underlying: "N".into(),
                strike,
                expiration: "2025-12-19".into(),
                expiration_timestamp: 45 * 86_400_000,
                option_type: OptionType::Call,
                bid: intrinsic - 0.05,
                bid_size: 1,
                ask: intrinsic + 0.05,
                ask_size: 1,
                mark: intrinsic.max(0.5) * (1.0 + iv / 100.0),
                last: intrinsic,
                volume: 10,
                open_interest: 100.0,
                live_open_interest: None,
                implied_volatility: iv / 100.0,
                timestamp: 0,
                greeks: None,
            }
        })
        .collect();
    OptionChain::new("N", spot, 0.03, 0.0, options)
}

proptest! {
    #[test]
    fn smoothed_total_variance_is_convex_across_noisy_inputs(
        noise in prop::collection::vec(-3.0f64..3.0, 6),
    ) {
        let base_iv = 20.0;
        let ivs: Vec<f64> = noise.iter().map(|n| (base_iv + n).max(5.0)).collect();
        let chain = chain_with_noisy_ivs(100.0, &ivs);
        let surfaces = get_iv_surfaces(VolModel::BlackScholes, SmoothingModel::TotalVariance, &chain, 0);
        let surface = surfaces.iter().find(|s| s.option_type == OptionType::Call).unwrap();

        if surface.strikes.len() >= 5 {
            let w: Vec<f64> = surface
                .smoothed_ivs
                .iter()
                .map(|&iv| (iv / 100.0).powi(2))
                .collect();
            for window in w.windows(3) {
                let second_diff = window[2] - 2.0 * window[1] + window[0];
                prop_assert!(second_diff >= -1e-6, "non-convex total variance: {:?}", window);
            }
        }
    }
}
