//! Built-in QuickStats catalog.
//!
//! QuickStats caps a single request at 50,000 records, so every dataset is
//! narrowed to state-level totals for one commodity and statistic. Survey
//! livestock inventories are large enough to need several year windows.

use super::types::DatasetSpec;

const FULL_RANGE: &[(i32, i32)] = &[(1950, 2025)];
const LIVESTOCK_SURVEY_RANGES: &[(i32, i32)] = &[(1950, 1979), (1980, 1999), (2000, 2025)];

fn state_totals(
    key: &str,
    commodity: &str,
    statistic: &str,
    name: &str,
    description: &str,
    windows: &[(i32, i32)],
) -> DatasetSpec {
    let mut spec = DatasetSpec::new(key, name, description)
        .with_param("commodity_desc", commodity)
        .with_param("statisticcat_desc", statistic)
        .with_param("agg_level_desc", "STATE")
        .with_param("domain_desc", "TOTAL");
    for &(start, end) in windows {
        spec = spec.with_window(start, end);
    }
    spec
}

fn survey_totals(
    key: &str,
    commodity: &str,
    statistic: &str,
    name: &str,
    description: &str,
) -> DatasetSpec {
    let mut spec = DatasetSpec::new(key, name, description)
        .with_param("commodity_desc", commodity)
        .with_param("statisticcat_desc", statistic)
        .with_param("agg_level_desc", "STATE")
        .with_param("source_desc", "SURVEY")
        .with_param("domain_desc", "TOTAL");
    for &(start, end) in LIVESTOCK_SURVEY_RANGES {
        spec = spec.with_window(start, end);
    }
    spec
}

/// The datasets ingested when no catalog file is configured.
pub fn builtin_datasets() -> Vec<DatasetSpec> {
    vec![
        // Corn
        state_totals(
            "corn_production",
            "CORN",
            "PRODUCTION",
            "Corn Production",
            "Corn production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "corn_yield",
            "CORN",
            "YIELD",
            "Corn Yield",
            "Corn yield by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "corn_area_harvested",
            "CORN",
            "AREA HARVESTED",
            "Corn Area Harvested",
            "Corn area harvested by state (totals)",
            FULL_RANGE,
        ),
        // Soybeans
        state_totals(
            "soybeans_production",
            "SOYBEANS",
            "PRODUCTION",
            "Soybeans Production",
            "Soybean production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "soybeans_yield",
            "SOYBEANS",
            "YIELD",
            "Soybeans Yield",
            "Soybean yield by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "soybeans_area_harvested",
            "SOYBEANS",
            "AREA HARVESTED",
            "Soybeans Area Harvested",
            "Soybean area harvested by state (totals)",
            FULL_RANGE,
        ),
        // Wheat
        state_totals(
            "wheat_production",
            "WHEAT",
            "PRODUCTION",
            "Wheat Production",
            "Wheat production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "wheat_yield",
            "WHEAT",
            "YIELD",
            "Wheat Yield",
            "Wheat yield by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "wheat_area_harvested",
            "WHEAT",
            "AREA HARVESTED",
            "Wheat Area Harvested",
            "Wheat area harvested by state (totals)",
            FULL_RANGE,
        ),
        // Rice
        state_totals(
            "rice_production",
            "RICE",
            "PRODUCTION",
            "Rice Production",
            "Rice production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "rice_yield",
            "RICE",
            "YIELD",
            "Rice Yield",
            "Rice yield by state (totals)",
            FULL_RANGE,
        ),
        // Barley
        state_totals(
            "barley_production",
            "BARLEY",
            "PRODUCTION",
            "Barley Production",
            "Barley production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "barley_yield",
            "BARLEY",
            "YIELD",
            "Barley Yield",
            "Barley yield by state (totals)",
            FULL_RANGE,
        ),
        // Oats
        state_totals(
            "oats_production",
            "OATS",
            "PRODUCTION",
            "Oats Production",
            "Oats production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "oats_yield",
            "OATS",
            "YIELD",
            "Oats Yield",
            "Oats yield by state (totals)",
            FULL_RANGE,
        ),
        // Sorghum
        state_totals(
            "sorghum_production",
            "SORGHUM",
            "PRODUCTION",
            "Sorghum Production",
            "Sorghum production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "sorghum_yield",
            "SORGHUM",
            "YIELD",
            "Sorghum Yield",
            "Sorghum yield by state (totals)",
            FULL_RANGE,
        ),
        // Cotton
        state_totals(
            "cotton_production",
            "COTTON",
            "PRODUCTION",
            "Cotton Production",
            "Cotton production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "cotton_yield",
            "COTTON",
            "YIELD",
            "Cotton Yield",
            "Cotton yield by state (totals)",
            FULL_RANGE,
        ),
        // Hay
        state_totals(
            "hay_production",
            "HAY",
            "PRODUCTION",
            "Hay Production",
            "Hay production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "hay_yield",
            "HAY",
            "YIELD",
            "Hay Yield",
            "Hay yield by state (totals)",
            FULL_RANGE,
        ),
        // Peanuts
        state_totals(
            "peanuts_production",
            "PEANUTS",
            "PRODUCTION",
            "Peanuts Production",
            "Peanuts production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "peanuts_yield",
            "PEANUTS",
            "YIELD",
            "Peanuts Yield",
            "Peanuts yield by state (totals)",
            FULL_RANGE,
        ),
        // Sunflower (not surveyed before 1970)
        state_totals(
            "sunflower_production",
            "SUNFLOWER",
            "PRODUCTION",
            "Sunflower Production",
            "Sunflower production by state (totals)",
            &[(1970, 2025)],
        ),
        // Sugar beets
        state_totals(
            "sugarbeets_production",
            "SUGARBEETS",
            "PRODUCTION",
            "Sugar Beets Production",
            "Sugar beets production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "sugarbeets_yield",
            "SUGARBEETS",
            "YIELD",
            "Sugar Beets Yield",
            "Sugar beets yield by state (totals)",
            FULL_RANGE,
        ),
        // Tobacco
        state_totals(
            "tobacco_production",
            "TOBACCO",
            "PRODUCTION",
            "Tobacco Production",
            "Tobacco production by state (totals)",
            FULL_RANGE,
        ),
        // Potatoes
        state_totals(
            "potatoes_production",
            "POTATOES",
            "PRODUCTION",
            "Potatoes Production",
            "Potatoes production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "potatoes_yield",
            "POTATOES",
            "YIELD",
            "Potatoes Yield",
            "Potatoes yield by state (totals)",
            FULL_RANGE,
        ),
        // Livestock
        survey_totals(
            "cattle_inventory",
            "CATTLE",
            "INVENTORY",
            "Cattle Inventory",
            "Cattle inventory by state (survey totals)",
        ),
        survey_totals(
            "hogs_inventory",
            "HOGS",
            "INVENTORY",
            "Hogs Inventory",
            "Hog inventory by state (survey totals)",
        ),
        state_totals(
            "chickens_inventory",
            "CHICKENS",
            "INVENTORY",
            "Chickens Inventory",
            "Chickens inventory by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "sheep_inventory",
            "SHEEP",
            "INVENTORY",
            "Sheep Inventory",
            "Sheep inventory by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "turkeys_inventory",
            "TURKEYS",
            "INVENTORY",
            "Turkeys Inventory",
            "Turkeys inventory by state (totals)",
            FULL_RANGE,
        ),
        // Dairy and eggs
        state_totals(
            "milk_production",
            "MILK",
            "PRODUCTION",
            "Milk Production",
            "Milk production by state (totals)",
            FULL_RANGE,
        ),
        state_totals(
            "eggs_production",
            "EGGS",
            "PRODUCTION",
            "Eggs Production",
            "Eggs production by state (totals)",
            FULL_RANGE,
        ),
    ]
}
