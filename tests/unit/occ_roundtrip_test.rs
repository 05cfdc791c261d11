use chrono::NaiveDate;
use dealer_flow::chains::{generate_chain_symbols, generate_occ_symbol, parse_occ_symbol};
use dealer_flow::model::OptionType;

#[test]
fn generated_chain_symbols_all_parse_back() {
    let expiration = NaiveDate::from_ymd_opt(2025, 9, 19).unwrap();
    let symbols = generate_chain_symbols("QQQ", expiration, &[380.0, 385.0, 390.0]);
    for symbol in symbols {
        let parsed = parse_occ_symbol(&symbol).unwrap();
        assert_eq!(parsed.root, "QQQ");
        assert_eq!(parsed.expiration, expiration);
    }
}

#[test]
fn strike_survives_fractional_cents() {
    let expiration = NaiveDate::from_ymd_opt(2025, 1, 17).unwrap();
    let symbol = generate_occ_symbol("SPX", expiration, OptionType::Put, 4500.125, true);
    let parsed = parse_occ_symbol(&symbol).unwrap();
    assert!((parsed.strike - 4500.125).abs() < 1e-6);
}
