use dealer_flow::chains::generate_strike_list;
use dealer_flow::exposure::calculate_gamma_vanna_charm_exposures;
use dealer_flow::hedge_impulse::{compute_hedge_impulse_curve, HedgeImpulseConfig};
use dealer_flow::model::{NormalizedOption, OptionChain, OptionType};
use dealer_flow::pressure_cloud::{compute_pressure_cloud, PressureCloudConfig};
use dealer_flow::regime::derive_regime_params;
use dealer_flow::surfaces::{get_iv_surfaces, SmoothingModel, VolModel};

fn synthetic_chain(spot: f64, expiration_timestamp: i64) -> OptionChain {
    let strikes = generate_strike_list(spot, 5.0, 6);
    let mut options = Vec::new();
    for &strike in &strikes {
        let intrinsic_call = (spot - strike).max(1.0);
        let intrinsic_put = (strike - spot).max(1.0);
        options.push(NormalizedOption {
            occ_symbol: format!("TEST{strike}C"),
            underlying: "TEST".into(),
            strike,
            expiration: "2025-12-19".into(),
            expiration_timestamp,
            option_type: OptionType::Call,
            bid: intrinsic_call - 0.05,
            bid_size: 10,
            ask: intrinsic_call + 0.05,
            ask_size: 10,
            mark: intrinsic_call,
            last: intrinsic_call,
            volume: 100,
            open_interest: 1000.0 + strike,
            live_open_interest: Some(1200.0 + strike),
            implied_volatility: 0.20,
            timestamp: 0,
            greeks: None,
        });
        options.push(NormalizedOption {
            occ_symbol: format!("TEST{strike}P"),
            underlying: "TEST".into(),
            strike,
            expiration: "2025-12-19".into(),
            expiration_timestamp,
            option_type: OptionType::Put,
            bid: intrinsic_put - 0.05,
            bid_size: 10,
            ask: intrinsic_put + 0.05,
            ask_size: 10,
            mark: intrinsic_put,
            last: intrinsic_put,
            volume: 100,
            open_interest: 800.0 + strike,
            live_open_interest: Some(750.0 + strike),
            implied_volatility: 0.22,
            timestamp: 0,
            greeks: None,
        });
    }
    OptionChain::new("TEST", spot, 0.04, 0.0, options)
}

#[test]
fn full_pipeline_runs_end_to_end_without_panicking() {
    let spot = 100.0;
    let expiration = 45 * 86_400_000;
    let chain = synthetic_chain(spot, expiration);

    let surfaces = get_iv_surfaces(VolModel::BlackScholes, SmoothingModel::TotalVariance, &chain, 0);
    assert_eq!(surfaces.len(), 2);

    let exposures = calculate_gamma_vanna_charm_exposures(&chain, &surfaces, Some(0));
    assert_eq!(exposures.len(), 1);
    let row = &exposures[0];
    assert_eq!(row.canonical.strike_exposures.len(), 13);

    let call_surface = surfaces.iter().find(|s| s.option_type == OptionType::Call).unwrap();
    let regime_params = derive_regime_params(call_surface, spot);
    assert!(regime_params.atm_iv > 0.0);

    let curve = compute_hedge_impulse_curve(row, call_surface, &HedgeImpulseConfig::default());
    assert!(!curve.points.is_empty());
    assert!(curve.points.iter().all(|p| p.impulse.is_finite()));

    let cloud = compute_pressure_cloud(&curve, &regime_params, &PressureCloudConfig::default());
    assert!(cloud.stability_zones.windows(2).all(|w| w[0].strength >= w[1].strength));
    assert!(cloud.acceleration_zones.windows(2).all(|w| w[0].strength >= w[1].strength));
}

#[test]
fn empty_chain_produces_no_exposures_or_surfaces() {
    let chain = OptionChain::new("TEST", 100.0, 0.04, 0.0, vec![]);
    let surfaces = get_iv_surfaces(VolModel::BlackScholes, SmoothingModel::TotalVariance, &chain, 0);
    assert!(surfaces.is_empty());
    let exposures = calculate_gamma_vanna_charm_exposures(&chain, &surfaces, Some(0));
    assert!(exposures.is_empty());
}
