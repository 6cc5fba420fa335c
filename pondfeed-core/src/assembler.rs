//! Projects a finished value store onto the result record returned to clients.

use crate::{
    normalize,
    pipeline::steps::parse_date,
    reference::YieldTable,
    store::{Key, ValueStore},
};
use pondfeed_schemas::{
    options::CalculationOptions,
    record::{
        AerationEfficiency, ClientDelta, ClientFields, CrossValidation, DateCheck, DensityCheck,
        DerivedMetrics, FeedingEfficiency, Productivity, ResultRecord,
    },
    sample::{FieldValue, Sample},
};
use std::collections::BTreeMap;

/// Largest supplied-vs-computed age gap still considered consistent.
pub const AGE_TOLERANCE_DAYS: i64 = 1;
/// Largest biologist vs cast-net density gap, in percent, still acceptable.
pub const CAST_NET_TOLERANCE_PCT: f64 = 15.0;

/// Keys the pipeline derives, reported with their rendered values.
pub const CALCULATED_KEYS: &[Key] = &[
    Key::AgeDays,
    Key::WeightIncrement,
    Key::GrowthRate,
    Key::ProjectedWeight,
    Key::ExpectedGrowth,
    Key::ConsumptionDensity,
    Key::KgPer100k,
    Key::FeedSacks,
    Key::Monday,
    Key::Tuesday,
    Key::Wednesday,
    Key::Thursday,
    Key::Friday,
    Key::Saturday,
    Key::Sunday,
    Key::WeeklyAverage,
    Key::WeeklyCumulative,
    Key::DieselAerators,
    Key::AerationCapacity,
    Key::LbsHaField,
    Key::LbsHaConsumption,
    Key::TotalLbsField,
    Key::TotalLbsConsumption,
    Key::FcaField,
    Key::FcaConsumption,
    Key::DensityDifference,
    Key::YieldLbsPerSack,
    Key::RecommendedLbs,
    Key::LbsPerAerator,
];

pub fn calculated_fields(store: &ValueStore) -> BTreeMap<String, String> {
    CALCULATED_KEYS
        .iter()
        .map(|key| (key.to_string(), store.get(*key)))
        .collect()
}

pub struct ResultAssembler<'a> {
    yields: &'a YieldTable,
    options: &'a CalculationOptions,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(yields: &'a YieldTable, options: &'a CalculationOptions) -> Self {
        Self { yields, options }
    }

    pub fn assemble(&self, sample: &Sample, store: &ValueStore) -> ResultRecord {
        let n = |key: Key| store.number(key);
        let s = |key: Key| store.get(key);

        ResultRecord {
            hectares: n(Key::Hectares),
            pond: s(Key::Pond),
            seeding_date: sample.seeding_date.clone().unwrap_or_default(),
            sampling_date: sample.sampling_date.clone().unwrap_or_default(),
            age_days: n(Key::AgeDays),
            growth_rate: n(Key::GrowthRate),
            seed_weight: s(Key::SeedWeight),
            current_weight: n(Key::CurrentWeight),
            projected_weight: s(Key::ProjectedWeight),
            expected_growth: s(Key::ExpectedGrowth),
            consumption_density: n(Key::ConsumptionDensity),
            feed_kg: n(Key::FeedKg),
            kg_per_100k: s(Key::KgPer100k),
            feed_sacks: n(Key::FeedSacks),
            biologist_density: n(Key::BiologistDensity),
            cast_net_density: s(Key::CastNetDensity),
            monday: n(Key::Monday),
            tuesday: n(Key::Tuesday),
            wednesday: n(Key::Wednesday),
            thursday: n(Key::Thursday),
            friday: n(Key::Friday),
            saturday: n(Key::Saturday),
            sunday: n(Key::Sunday),
            weekly_average: n(Key::WeeklyAverage),
            weekly_cumulative: n(Key::WeeklyCumulative),
            feeder_count: n(Key::FeederCount),
            mechanical_aerators: n(Key::MechanicalAerators),
            diesel_aerators: s(Key::DieselAerators),
            aeration_capacity: s(Key::AerationCapacity),
            recommended_lbs: s(Key::RecommendedLbs),
            lbs_ha_field: n(Key::LbsHaField),
            tray_lbs_consumption: s(Key::TrayLbsConsumption),
            lbs_ha_consumption: n(Key::LbsHaConsumption),
            density_difference: s(Key::DensityDifference),
            previous_weight: n(Key::PreviousWeight),
            weight_increment: n(Key::WeightIncrement),
            cumulative_feed_lbs: n(Key::CumulativeFeedLbs),
            fca_field: s(Key::FcaField),
            total_lbs_field: s(Key::TotalLbsField),
            total_lbs_consumption: n(Key::TotalLbsConsumption),
            hp_per_hectare: s(Key::HpPerHectare),
            lbs_per_aerator: s(Key::LbsPerAerator),
            tray_lbs_field: s(Key::TrayLbsField),
            fca_consumption: s(Key::FcaConsumption),
            yield_lbs_per_sack: s(Key::YieldLbsPerSack),
            client: client_fields(sample),
            client_deltas: client_deltas(sample, store),
            cross_validation: cross_validation(sample, store),
            derived_metrics: self.derived_metrics(store),
        }
    }

    fn derived_metrics(&self, store: &ValueStore) -> DerivedMetrics {
        let total_lbs = store.number(Key::TotalLbsField);
        let aerators = store.number(Key::MechanicalAerators);
        let hectares = store.number(Key::Hectares);
        let feed_kg = store.number(Key::FeedKg);
        let fca = store.number(Key::FcaField);
        let weight = store.number(Key::CurrentWeight);
        let density = store.number(Key::BiologistDensity);

        let aeration = (aerators > 0.0 && hectares > 0.0).then(|| AerationEfficiency {
            lbs_per_aerator: total_lbs / aerators,
            aerators_per_hectare: aerators / hectares,
            lbs_per_hectare: total_lbs / hectares,
        });

        let feeding = (feed_kg > 0.0 && total_lbs > 0.0).then(|| {
            let biomass_kg = total_lbs * self.options.lbs_to_kg;
            FeedingEfficiency {
                feed_kg_per_biomass_kg: feed_kg / biomass_kg,
                feed_percent_of_biomass: feed_kg / biomass_kg * 100.0,
                conversion_efficiency: if fca > 0.0 { 1.0 / fca } else { 0.0 },
            }
        });

        let productivity = (weight > 0.0 && density > 0.0).then(|| Productivity {
            grams_per_m2: weight * density,
            // 10 000 m²/ha over 1 000 g/kg.
            kg_per_hectare: weight * density * 10.0,
            individuals_per_m2: density,
            mean_weight_g: weight,
            expected_yield_pct: self.yields.nearest(weight),
        });

        DerivedMetrics { aeration, feeding, productivity }
    }
}

fn numeric(value: &Option<FieldValue>) -> Option<f64> {
    value.as_ref().map(|v| normalize::normalize(Some(v)))
}

fn client_fields(sample: &Sample) -> ClientFields {
    let aux = &sample.auxiliary;
    ClientFields {
        seed_weight: numeric(&aux.seed_weight_g),
        cast_net_density: numeric(&aux.cast_net_density),
        feed_type: aux.feed_type.clone(),
        feed_brand: aux.feed_brand.clone(),
        weight_increment: numeric(&aux.client_increment_g),
        growth_rate: numeric(&aux.client_growth_rate),
        projected_weight: numeric(&aux.client_projected_weight_g),
        expected_growth: numeric(&aux.client_expected_growth_g),
    }
}

/// Client pre-computations against ours. Only reported, never applied.
fn client_deltas(sample: &Sample, store: &ValueStore) -> BTreeMap<String, ClientDelta> {
    let aux = &sample.auxiliary;
    let pairs = [
        (Key::SeedWeight, &aux.seed_weight_g),
        (Key::WeightIncrement, &aux.client_increment_g),
        (Key::GrowthRate, &aux.client_growth_rate),
        (Key::ProjectedWeight, &aux.client_projected_weight_g),
        (Key::ExpectedGrowth, &aux.client_expected_growth_g),
    ];

    pairs
        .into_iter()
        .filter_map(|(key, supplied)| {
            let client = numeric(supplied)?;
            let computed = store.number(key);
            if computed <= 0.0 {
                return None;
            }
            let absolute = (client - computed).abs();
            Some((
                key.to_string(),
                ClientDelta {
                    client,
                    computed,
                    absolute,
                    percent: absolute / computed * 100.0,
                },
            ))
        })
        .collect()
}

fn cross_validation(sample: &Sample, store: &ValueStore) -> CrossValidation {
    let seeding = sample.seeding_date.as_deref().and_then(parse_date);
    let sampling = sample.sampling_date.as_deref().and_then(parse_date);

    let dates = match (seeding, sampling) {
        (Some(seeding), Some(sampling)) => {
            let computed_age = (sampling - seeding).num_days() + 1;
            let supplied_age = numeric(&sample.age_days)
                .filter(|age| *age > 0.0)
                .map(|age| age as i64);
            let difference_days = supplied_age.map_or(0, |age| (age - computed_age).abs());
            DateCheck::Checked {
                supplied_age,
                computed_age,
                difference_days,
                consistent: difference_days <= AGE_TOLERANCE_DAYS,
            }
        }
        _ => DateCheck::Failed {
            error: "Fechas faltantes o con formato inválido (dd/mm/aaaa)".to_string(),
        },
    };

    let densities = numeric(&sample.auxiliary.cast_net_density).map(|cast_net| {
        let biologist = store.number(Key::BiologistDensity);
        let absolute = (biologist - cast_net).abs();
        let percent = if biologist > 0.0 { absolute / biologist * 100.0 } else { 0.0 };
        DensityCheck {
            biologist,
            cast_net,
            absolute,
            percent,
            acceptable: biologist > 0.0 && percent <= CAST_NET_TOLERANCE_PCT,
        }
    });

    CrossValidation { dates: Some(dates), densities }
}
