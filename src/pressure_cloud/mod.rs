/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Translates a [`HedgeImpulseCurve`] into discrete price zones and the
//! index-futures hedge sizing a dealer desk would actually place against
//! each zone.

use crate::hedge_impulse::{CrossingDirection, HedgeImpulseCurve, HedgeImpulsePoint};
use crate::regime::RegimeParams;
use serde::{Deserialize, Serialize};

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Standard index-futures contract multipliers, in points per contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HedgeInstrument {
    Nq,
    Mnq,
    Es,
    Mes,
}

impl HedgeInstrument {
    pub fn multiplier(self) -> f64 {
        match self {
            HedgeInstrument::Nq => 20.0,
            HedgeInstrument::Mnq => 2.0,
            HedgeInstrument::Es => 50.0,
            HedgeInstrument::Mes => 5.0,
        }
    }
}

/// Whether a dealer hedging this zone is leaning into price (mean-reversion,
/// passive resting orders) or chasing it (momentum, aggressive execution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HedgeType {
    Passive,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Stability,
    Acceleration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneSide {
    AboveSpot,
    BelowSpot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureZone {
    pub center: f64,
    pub price_low: f64,
    pub price_high: f64,
    /// Capped to `[0, 1]`.
    pub strength: f64,
    pub kind: ZoneKind,
    pub side: ZoneSide,
    pub trade_type: TradeType,
    pub hedge_type: HedgeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeEdgeType {
    StableToUnstable,
    UnstableToStable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeEdge {
    pub price: f64,
    pub edge_type: RegimeEdgeType,
}

/// One price level's stability/acceleration scores and per-instrument hedge
/// sizing, derived directly from the impulse curve at that price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevelRow {
    pub price: f64,
    pub stability_score: f64,
    pub acceleration_score: f64,
    /// Legacy single-number estimate using `config.contract_multiplier`.
    pub expected_hedge_contracts: f64,
    pub nq_contracts: f64,
    pub mnq_contracts: f64,
    pub es_contracts: f64,
    pub mes_contracts: f64,
    pub hedge_type: HedgeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureCloud {
    pub spot: f64,
    pub expiration_timestamp: i64,
    pub computed_at: i64,
    /// Basin-centered, sorted by `strength` descending.
    pub stability_zones: Vec<PressureZone>,
    /// Peak-centered, sorted by `strength` descending.
    pub acceleration_zones: Vec<PressureZone>,
    pub regime_edges: Vec<RegimeEdge>,
    pub levels: Vec<PriceLevelRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureCloudConfig {
    /// Multiplier backing the legacy single-number `expected_hedge_contracts`.
    pub contract_multiplier: f64,
    /// Reach range, as a multiple of `expectedDailySpotMove * spot`.
    pub reachability_multiple: f64,
    /// Minimum strength ratio (vs. the largest basin/peak) a zone must clear to survive.
    pub zone_threshold: f64,
}

impl Default for PressureCloudConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: 20.0,
            reachability_multiple: 2.0,
            zone_threshold: 0.15,
        }
    }
}

fn proximity(price: f64, spot: f64, reach: f64) -> f64 {
    if reach <= 1e-12 {
        return if (price - spot).abs() < 1e-9 { 1.0 } else { 0.0 };
    }
    let z = (price - spot).abs() / reach;
    (-z * z).exp()
}

fn level_row(point: &HedgeImpulsePoint, spot: f64, reach: f64, config: &PressureCloudConfig) -> PriceLevelRow {
    let prox = proximity(point.price, spot, reach);
    let stability_score = sanitize(point.impulse.max(0.0) * prox);
    let acceleration_score = sanitize((-point.impulse).max(0.0) * prox);
    let denom_legacy = config.contract_multiplier * spot * 0.01;
    let expected_hedge_contracts = sanitize(if denom_legacy.abs() > 1e-12 { point.impulse / denom_legacy } else { 0.0 });
    let contracts_for = |multiplier: f64| {
        let denom = multiplier * spot * 0.01;
        sanitize(if denom.abs() > 1e-12 { point.impulse / denom } else { 0.0 })
    };
    PriceLevelRow {
        price: point.price,
        stability_score,
        acceleration_score,
        expected_hedge_contracts,
        nq_contracts: contracts_for(HedgeInstrument::Nq.multiplier()),
        mnq_contracts: contracts_for(HedgeInstrument::Mnq.multiplier()),
        es_contracts: contracts_for(HedgeInstrument::Es.multiplier()),
        mes_contracts: contracts_for(HedgeInstrument::Mes.multiplier()),
        hedge_type: if point.impulse >= 0.0 { HedgeType::Passive } else { HedgeType::Aggressive },
    }
}

/// Finds the grid index whose price is nearest `target`.
fn nearest_index(points: &[HedgeImpulsePoint], target: f64) -> usize {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.price - target).abs().partial_cmp(&(b.price - target).abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Scans left and right from `idx` while the curve stays at or beyond half
/// the center's impulse, in the same direction (positive for a basin,
/// negative for a peak). Stops at the grid boundary otherwise.
fn zone_bounds(points: &[HedgeImpulsePoint], idx: usize, is_basin: bool) -> (f64, f64) {
    let half = points[idx].impulse / 2.0;
    let holds = |v: f64| if is_basin { v >= half } else { v <= half };

    let mut lo = idx;
    while lo > 0 && holds(points[lo - 1].impulse) {
        lo -= 1;
    }
    let mut hi = idx;
    while hi < points.len() - 1 && holds(points[hi + 1].impulse) {
        hi += 1;
    }
    (points[lo].price, points[hi].price)
}

#[allow(clippy::too_many_arguments)]
fn build_zone(
    points: &[HedgeImpulsePoint],
    center: f64,
    impulse: f64,
    spot: f64,
    reach: f64,
    max_abs_impulse: f64,
    kind: ZoneKind,
    is_basin: bool,
) -> Option<PressureZone> {
    if max_abs_impulse <= 1e-12 {
        return None;
    }
    let idx = nearest_index(points, center);
    let raw_strength = (impulse.abs() / max_abs_impulse) * proximity(center, spot, reach);

    let (price_low, price_high) = zone_bounds(points, idx, is_basin);
    let side = if center >= spot { ZoneSide::AboveSpot } else { ZoneSide::BelowSpot };
    let (trade_type, hedge_type) = match kind {
        ZoneKind::Stability => (
            if matches!(side, ZoneSide::BelowSpot) { TradeType::Long } else { TradeType::Short },
            HedgeType::Passive,
        ),
        ZoneKind::Acceleration => (
            if matches!(side, ZoneSide::BelowSpot) { TradeType::Short } else { TradeType::Long },
            HedgeType::Aggressive,
        ),
    };

    Some(PressureZone {
        center,
        price_low,
        price_high,
        strength: raw_strength.min(1.0),
        kind,
        side,
        trade_type,
        hedge_type,
    })
}

fn classify_edge(direction: CrossingDirection, price: f64, spot: f64) -> RegimeEdgeType {
    use CrossingDirection::{Falling, Rising};
    let below = price < spot;
    match (direction, below) {
        (Falling, true) => RegimeEdgeType::StableToUnstable,
        (Falling, false) => RegimeEdgeType::UnstableToStable,
        (Rising, true) => RegimeEdgeType::UnstableToStable,
        (Rising, false) => RegimeEdgeType::StableToUnstable,
    }
}

/// Extracts stability zones (basins: positive impulse, mean-reverting),
/// acceleration zones (peaks: negative impulse, trend-following), regime
/// edges at the curve's zero crossings, and a per-price-level stability/
/// acceleration score and futures hedge-contract estimate.
pub fn compute_pressure_cloud(
    curve: &HedgeImpulseCurve,
    regime: &RegimeParams,
    config: &PressureCloudConfig,
) -> PressureCloud {
    let spot = curve.spot;
    let reach = (regime.expected_daily_spot_move * spot * config.reachability_multiple).abs();

    let levels: Vec<PriceLevelRow> = curve.points.iter().map(|p| level_row(p, spot, reach, config)).collect();

    let max_basin_abs = curve.basins.iter().map(|b| b.impulse.abs()).fold(0.0, f64::max);
    let max_peak_abs = curve.peaks.iter().map(|p| p.impulse.abs()).fold(0.0, f64::max);

    let mut stability_zones: Vec<PressureZone> = curve
        .basins
        .iter()
        .filter_map(|b| build_zone(&curve.points, b.price, b.impulse, spot, reach, max_basin_abs, ZoneKind::Stability, true))
        .filter(|z| z.strength >= config.zone_threshold)
        .collect();
    stability_zones.sort_by(|a, b| b.strength.partial_cmp(&a.strength).unwrap());

    let mut acceleration_zones: Vec<PressureZone> = curve
        .peaks
        .iter()
        .filter_map(|p| build_zone(&curve.points, p.price, p.impulse, spot, reach, max_peak_abs, ZoneKind::Acceleration, false))
        .filter(|z| z.strength >= config.zone_threshold)
        .collect();
    acceleration_zones.sort_by(|a, b| b.strength.partial_cmp(&a.strength).unwrap());

    let regime_edges = curve
        .zero_crossings
        .iter()
        .map(|z| RegimeEdge {
            price: z.price,
            edge_type: classify_edge(z.direction, z.price, spot),
        })
        .collect();

    PressureCloud {
        spot,
        expiration_timestamp: curve.expiration_timestamp,
        computed_at: now_ms(),
        stability_zones,
        acceleration_zones,
        regime_edges,
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hedge_impulse::{Extremum, ExtremumKind, HedgeImpulsePoint, ImpulseBias, ImpulseRegime, ZeroCrossing};
    use crate::regime::Regime;

    fn flat_regime(move_pct: f64) -> RegimeParams {
        RegimeParams {
            atm_iv: 0.20,
            implied_spot_vol_corr: -0.1,
            implied_vol_of_vol: 0.05,
            regime: Regime::Normal,
            expected_daily_spot_move: move_pct,
            expected_daily_vol_move: 0.01,
        }
    }

    fn grid(spot: f64, step: f64, n_each_side: i64, impulses: impl Fn(f64) -> f64) -> Vec<HedgeImpulsePoint> {
        (-n_each_side..=n_each_side)
            .map(|i| {
                let price = spot + i as f64 * step;
                let impulse = impulses(price);
                HedgeImpulsePoint {
                    price,
                    gamma_smoothed: impulse,
                    vanna_smoothed: 0.0,
                    impulse,
                }
            })
            .collect()
    }

    fn curve_with(points: Vec<HedgeImpulsePoint>, basins: Vec<Extremum>, peaks: Vec<Extremum>, crossings: Vec<ZeroCrossing>) -> HedgeImpulseCurve {
        HedgeImpulseCurve {
            spot: 100.0,
            expiration_timestamp: 1,
            computed_at: 0,
            points,
            k: 5.0,
            kernel_width: 2.0,
            detected_strike_spacing: 1.0,
            impulse_at_spot: 0.0,
            slope_at_spot: 0.0,
            zero_crossings: crossings,
            basins,
            peaks,
            asymmetry: ImpulseBias::Neutral,
            asymmetry_ratio: 0.0,
            regime: ImpulseRegime::Neutral,
            nearest_basin_above: None,
            nearest_basin_below: None,
        }
    }

    #[test]
    fn zones_sorted_by_strength_descending() {
        let points = grid(100.0, 1.0, 10, |p| {
            if (p - 98.0).abs() < 0.5 {
                2.0
            } else if (p - 102.0).abs() < 0.5 {
                9.0
            } else {
                0.1
            }
        });
        let basins = vec![
            Extremum { price: 98.0, impulse: 2.0, kind: ExtremumKind::Basin },
            Extremum { price: 102.0, impulse: 9.0, kind: ExtremumKind::Basin },
        ];
        let curve = curve_with(points, basins, vec![], vec![]);
        let cloud = compute_pressure_cloud(&curve, &flat_regime(0.01), &PressureCloudConfig::default());
        assert_eq!(cloud.stability_zones.len(), 2);
        assert!(cloud.stability_zones[0].strength >= cloud.stability_zones[1].strength);
    }

    #[test]
    fn stability_zones_are_passive_acceleration_zones_are_aggressive() {
        let points = grid(100.0, 1.0, 10, |p| {
            if (p - 98.0).abs() < 0.5 {
                3.0
            } else if (p - 103.0).abs() < 0.5 {
                -3.0
            } else {
                0.05
            }
        });
        let basins = vec![Extremum { price: 98.0, impulse: 3.0, kind: ExtremumKind::Basin }];
        let peaks = vec![Extremum { price: 103.0, impulse: -3.0, kind: ExtremumKind::Peak }];
        let curve = curve_with(points, basins, peaks, vec![]);
        let cloud = compute_pressure_cloud(&curve, &flat_regime(0.02), &PressureCloudConfig::default());
        assert_eq!(cloud.stability_zones[0].hedge_type, HedgeType::Passive);
        assert_eq!(cloud.acceleration_zones[0].hedge_type, HedgeType::Aggressive);
        assert_eq!(cloud.stability_zones[0].trade_type, TradeType::Long);
        assert_eq!(cloud.acceleration_zones[0].trade_type, TradeType::Short);
    }

    #[test]
    fn regime_edges_classified_by_direction_and_side() {
        let points = grid(100.0, 1.0, 5, |_| 0.0);
        let crossings = vec![
            ZeroCrossing { price: 99.0, direction: CrossingDirection::Falling },
            ZeroCrossing { price: 101.0, direction: CrossingDirection::Rising },
        ];
        let curve = curve_with(points, vec![], vec![], crossings);
        let cloud = compute_pressure_cloud(&curve, &flat_regime(0.01), &PressureCloudConfig::default());
        assert_eq!(cloud.regime_edges.len(), 2);
        assert_eq!(cloud.regime_edges[0].edge_type, RegimeEdgeType::StableToUnstable);
        assert_eq!(cloud.regime_edges[1].edge_type, RegimeEdgeType::StableToUnstable);
    }

    #[test]
    fn hedge_contracts_scale_consistently_across_instruments() {
        let points = grid(100.0, 1.0, 3, |p| if (p - 100.0).abs() < 1e-9 { 5.0 } else { 0.0 });
        let curve = curve_with(points, vec![], vec![], vec![]);
        let cloud = compute_pressure_cloud(&curve, &flat_regime(0.01), &PressureCloudConfig::default());
        let level = cloud.levels.iter().find(|l| (l.price - 100.0).abs() < 1e-9).unwrap();
        let spot = 100.0;
        let i = 5.0;
        assert!((level.nq_contracts * 20.0 - i / (0.01 * spot)).abs() < 1e-6);
        assert!((level.mnq_contracts * 2.0 - i / (0.01 * spot)).abs() < 1e-6);
        assert!((level.es_contracts * 50.0 - i / (0.01 * spot)).abs() < 1e-6);
        assert!((level.mes_contracts * 5.0 - i / (0.01 * spot)).abs() < 1e-6);
    }
}
