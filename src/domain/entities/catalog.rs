//! # Built-in Service Catalog
//!
//! Schemas and compiled-in fallback rates for the services shipped with the
//! engine. The fallback rates are the last resolution tier: they are used
//! only when neither the config service nor the shared services context has
//! a value for a leaf.

use crate::domain::entities::effective_config::{
    CoreRates, PresetPrice, RateCard, SquareFootageRates,
};
use crate::domain::entities::service_schema::{AreaDefinition, ServiceSchema};
use crate::domain::value_objects::enums::PricingType::{PerHour, PerWorker, Preset, SquareFeet};
use crate::domain::value_objects::{AreaKey, ServiceId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

fn dollars(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn card(
    core: CoreRates,
    square_footage: SquareFootageRates,
    presets: Vec<(&str, PresetPrice)>,
) -> RateCard {
    RateCard {
        core,
        square_footage,
        area_pricing: presets
            .into_iter()
            .map(|(key, price)| (AreaKey::new(key), price))
            .collect::<BTreeMap<_, _>>(),
        ..RateCard::default()
    }
}

/// Power washing: dumpster pads, patios, walkways, building exteriors and
/// parking lots. Labour visits carry a trip charge.
#[must_use]
pub fn power_washing() -> ServiceSchema {
    let fallback = card(
        CoreRates {
            worker_rate: dollars(200),
            hourly_rate: dollars(125),
            minimum_visit: dollars(475),
            trip_charge: dollars(75),
            trip_waive_threshold: dollars(1500),
        },
        SquareFootageRates {
            fixed_fee: dollars(200),
            inside_rate: Decimal::new(60, 2),
            outside_rate: Decimal::new(40, 2),
        },
        vec![
            ("dumpster", PresetPrice::base(dollars(250))),
            (
                "patio",
                PresetPrice::base(dollars(300)).with_addon("sealant", dollars(100)),
            ),
        ],
    );

    ServiceSchema::new(ServiceId::new("power_washing"), "Power Washing", fallback)
        .with_area(AreaDefinition::new(
            "dumpster",
            "Dumpster Pad",
            &[Preset, PerWorker, PerHour],
        ))
        .with_area(AreaDefinition::new("patio", "Patio", &[Preset, SquareFeet]))
        .with_area(AreaDefinition::new(
            "walkway",
            "Walkway",
            &[SquareFeet, PerHour],
        ))
        .with_area(AreaDefinition::new(
            "building_exterior",
            "Building Exterior",
            &[PerWorker, PerHour, SquareFeet],
        ))
        .with_area(AreaDefinition::new(
            "parking_lot",
            "Parking Lot",
            &[SquareFeet, PerHour],
        ))
}

/// Drain service: per-drain packages plus hourly plumbing work. No trip charge.
#[must_use]
pub fn drain_service() -> ServiceSchema {
    let fallback = card(
        CoreRates {
            worker_rate: dollars(0),
            hourly_rate: dollars(150),
            minimum_visit: dollars(100),
            trip_charge: dollars(0),
            trip_waive_threshold: dollars(0),
        },
        SquareFootageRates::default(),
        vec![
            ("standard_drain", PresetPrice::base(dollars(25))),
            (
                "foaming_drain",
                PresetPrice::base(dollars(20)).with_variant("heavy_buildup", dollars(30)),
            ),
            ("grease_trap", PresetPrice::base(dollars(200))),
            ("green_drain", PresetPrice::base(dollars(100))),
        ],
    );

    ServiceSchema::new(ServiceId::new("drain_service"), "Drain Service", fallback)
        .with_area(AreaDefinition::new("standard_drain", "Standard Drain", &[Preset]))
        .with_area(AreaDefinition::new("foaming_drain", "Foaming Drain", &[Preset]))
        .with_area(AreaDefinition::new(
            "grease_trap",
            "Grease Trap",
            &[Preset, PerHour],
        ))
        .with_area(AreaDefinition::new("green_drain", "Green Drain", &[Preset]))
        .with_area(AreaDefinition::new(
            "plumbing_work",
            "Plumbing Work",
            &[PerHour],
        ))
}

/// Window cleaning: per-pane packages, square footage, hourly storefront work.
#[must_use]
pub fn window_cleaning() -> ServiceSchema {
    let fallback = card(
        CoreRates {
            worker_rate: dollars(0),
            hourly_rate: dollars(85),
            minimum_visit: dollars(150),
            trip_charge: dollars(0),
            trip_waive_threshold: dollars(0),
        },
        SquareFootageRates {
            fixed_fee: dollars(50),
            inside_rate: Decimal::new(5, 2),
            outside_rate: Decimal::new(4, 2),
        },
        vec![
            ("inside_windows", PresetPrice::base(dollars(3))),
            ("outside_windows", PresetPrice::base(dollars(4))),
            ("storefront", PresetPrice::base(dollars(75))),
            (
                "skylights",
                PresetPrice::base(dollars(10)).with_variant("high_access", dollars(18)),
            ),
        ],
    );

    ServiceSchema::new(ServiceId::new("window_cleaning"), "Window Cleaning", fallback)
        .with_area(AreaDefinition::new(
            "inside_windows",
            "Inside Windows",
            &[Preset, SquareFeet],
        ))
        .with_area(AreaDefinition::new(
            "outside_windows",
            "Outside Windows",
            &[Preset, SquareFeet],
        ))
        .with_area(AreaDefinition::new(
            "storefront",
            "Storefront",
            &[PerHour, Preset],
        ))
        .with_area(AreaDefinition::new("skylights", "Skylights", &[Preset]))
}

/// Commercial kitchen cleaning: size-dependent kitchen packages, hood
/// filters, exhaust fans and floors. Labour visits carry a trip charge.
#[must_use]
pub fn kitchen_cleaning() -> ServiceSchema {
    let fallback = card(
        CoreRates {
            worker_rate: dollars(180),
            hourly_rate: dollars(95),
            minimum_visit: dollars(300),
            trip_charge: dollars(50),
            trip_waive_threshold: dollars(1000),
        },
        SquareFootageRates {
            fixed_fee: dollars(100),
            inside_rate: Decimal::new(35, 2),
            outside_rate: Decimal::new(25, 2),
        },
        vec![
            (
                "kitchen",
                PresetPrice::base(dollars(1500))
                    .with_variant("small_medium", dollars(1500))
                    .with_variant("large", dollars(2500)),
            ),
            ("hood_filters", PresetPrice::base(dollars(15))),
            ("exhaust_fan", PresetPrice::base(dollars(150))),
        ],
    );

    ServiceSchema::new(ServiceId::new("kitchen_cleaning"), "Kitchen Cleaning", fallback)
        .with_area(AreaDefinition::new("kitchen", "Kitchen", &[Preset, PerWorker]))
        .with_area(AreaDefinition::new("hood_filters", "Hood Filters", &[Preset]))
        .with_area(AreaDefinition::new(
            "exhaust_fan",
            "Exhaust Fan",
            &[Preset, PerHour],
        ))
        .with_area(AreaDefinition::new(
            "kitchen_floor",
            "Kitchen Floor",
            &[SquareFeet, PerHour],
        ))
}

/// Every built-in schema.
#[must_use]
pub fn all() -> Vec<ServiceSchema> {
    vec![
        power_washing(),
        drain_service(),
        window_cleaning(),
        kitchen_cleaning(),
    ]
}
