use crate::{
    error::StepError,
    reference::ReferenceTable,
    store::{Key, Quantity, ValueStore},
};
use chrono::NaiveDate;
use pondfeed_schemas::options::CalculationOptions;
use tracing::warn;

pub type StepValue = Result<Quantity, StepError>;

/// What a step does to its output key.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Write(StepValue),
    /// Leave the store untouched.
    Skip,
}

impl From<StepValue> for StepOutcome {
    fn from(value: StepValue) -> Self {
        StepOutcome::Write(value)
    }
}

/// Read-only inputs shared by every step of a run.
pub struct StepContext<'a> {
    pub reference: &'a ReferenceTable,
    pub options: &'a CalculationOptions,
}

#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub output: Key,
    pub inputs: &'static [Key],
    pub compute: fn(&StepContext<'_>, &ValueStore) -> StepOutcome,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish()
    }
}

/// Keys a sample may seed before the first step runs.
pub const SEEDED_KEYS: &[Key] = &[
    Key::Hectares,
    Key::Pond,
    Key::SeedingDate,
    Key::SamplingDate,
    Key::AgeDays,
    Key::PreviousWeight,
    Key::CurrentWeight,
    Key::BiologistDensity,
    Key::CumulativeFeedLbs,
    Key::FeederCount,
    Key::MechanicalAerators,
    Key::FeedKg,
    Key::SeedWeight,
    Key::CastNetDensity,
];

pub const DATE_FORMAT: &str = "%d/%m/%Y";

macro_rules! step {
    ($name:literal, $output:expr, [$($input:expr),* $(,)?], $compute:expr) => {
        Step { name: $name, output: $output, inputs: &[$($input),*], compute: $compute }
    };
}

pub const STEPS: &[Step] = &[
    step!("age", Key::AgeDays, [Key::SeedingDate, Key::SamplingDate], age),
    step!("weight_increment", Key::WeightIncrement, [Key::CurrentWeight, Key::PreviousWeight], weight_increment),
    step!("growth_rate", Key::GrowthRate, [Key::CurrentWeight, Key::SeedWeight, Key::AgeDays], growth_rate),
    step!("projected_weight", Key::ProjectedWeight, [Key::CurrentWeight, Key::AgeDays], projected_weight),
    step!("expected_growth", Key::ExpectedGrowth, [Key::ProjectedWeight, Key::CurrentWeight], expected_growth),
    step!(
        "consumption_density",
        Key::ConsumptionDensity,
        [Key::FeedKg, Key::Hectares, Key::CurrentWeight],
        consumption_density
    ),
    step!("kg_per_100k", Key::KgPer100k, [Key::FeedKg, Key::Hectares, Key::ConsumptionDensity], kg_per_100k),
    step!("feed_sacks", Key::FeedSacks, [Key::FeedKg], feed_sacks),
    step!("sunday", Key::Sunday, [Key::ProjectedWeight, Key::Hectares, Key::BiologistDensity], sunday),
    step!("monday", Key::Monday, [Key::CurrentWeight, Key::Hectares, Key::BiologistDensity], monday),
    step!("tuesday", Key::Tuesday, [Key::Monday, Key::Sunday], tuesday),
    step!("wednesday", Key::Wednesday, [Key::Monday, Key::Sunday], wednesday),
    step!("thursday", Key::Thursday, [Key::Monday, Key::Sunday], thursday),
    step!("friday", Key::Friday, [Key::Monday, Key::Sunday], friday),
    step!("saturday", Key::Saturday, [Key::Monday, Key::Sunday], saturday),
    step!(
        "weekly_average",
        Key::WeeklyAverage,
        [
            Key::Monday,
            Key::Tuesday,
            Key::Wednesday,
            Key::Thursday,
            Key::Friday,
            Key::Saturday,
            Key::Sunday,
        ],
        weekly_average
    ),
    step!("weekly_cumulative", Key::WeeklyCumulative, [Key::WeeklyAverage], weekly_cumulative),
    step!("diesel_aerators", Key::DieselAerators, [Key::MechanicalAerators, Key::Hectares], diesel_aerators),
    step!("aeration_capacity", Key::AerationCapacity, [Key::DieselAerators, Key::Hectares], aeration_capacity),
    step!("lbs_ha_field", Key::LbsHaField, [Key::BiologistDensity, Key::CurrentWeight], lbs_ha_field),
    step!(
        "lbs_ha_consumption",
        Key::LbsHaConsumption,
        [Key::ConsumptionDensity, Key::CurrentWeight],
        lbs_ha_consumption
    ),
    step!("total_lbs_field", Key::TotalLbsField, [Key::LbsHaField, Key::Hectares], total_lbs_field),
    step!(
        "total_lbs_consumption",
        Key::TotalLbsConsumption,
        [Key::LbsHaConsumption, Key::Hectares],
        total_lbs_consumption
    ),
    step!("tray_lbs_field", Key::TrayLbsField, [Key::LbsHaField, Key::Hectares, Key::FeederCount], tray_lbs_field),
    step!(
        "tray_lbs_consumption",
        Key::TrayLbsConsumption,
        [Key::LbsHaConsumption, Key::Hectares, Key::FeederCount],
        tray_lbs_consumption
    ),
    step!("hp_per_hectare", Key::HpPerHectare, [Key::MechanicalAerators, Key::Hectares], hp_per_hectare),
    step!("fca_field", Key::FcaField, [Key::CumulativeFeedLbs, Key::TotalLbsField], fca_field),
    step!(
        "fca_consumption",
        Key::FcaConsumption,
        [Key::CumulativeFeedLbs, Key::TotalLbsConsumption],
        fca_consumption
    ),
    step!(
        "yield_lbs_per_sack",
        Key::YieldLbsPerSack,
        [Key::LbsHaField, Key::Hectares, Key::FeedKg],
        yield_lbs_per_sack
    ),
    step!("recommended_lbs", Key::RecommendedLbs, [Key::Hectares], recommended_lbs),
    step!(
        "density_difference",
        Key::DensityDifference,
        [Key::ConsumptionDensity, Key::BiologistDensity],
        density_difference
    ),
    step!("lbs_per_aerator", Key::LbsPerAerator, [Key::TotalLbsField, Key::MechanicalAerators], lbs_per_aerator),
];

fn finite(value: f64) -> Result<f64, StepError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StepError::NonFinite)
    }
}

fn or_one(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Days between the two dates, counting the seeding day.
pub fn cultivation_days(seeding: &str, sampling: &str) -> Option<i64> {
    let seeding = parse_date(seeding)?;
    let sampling = parse_date(sampling)?;
    let days = (sampling - seeding).num_days();
    (days >= 0).then_some(days + 1)
}

fn age(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    if store.contains(Key::AgeDays) {
        return StepOutcome::Skip;
    }

    let seeding = store.text(Key::SeedingDate).unwrap_or_default();
    let sampling = store.text(Key::SamplingDate).unwrap_or_default();
    match cultivation_days(&seeding, &sampling) {
        Some(days) => Ok(Quantity::integer(days as f64)).into(),
        None => {
            warn!(seeding = %seeding, sampling = %sampling, "cannot derive cultivation age from dates");
            StepOutcome::Skip
        }
    }
}

fn weight_increment(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let previous = store.number(Key::PreviousWeight);
    if previous == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    finite(store.number(Key::CurrentWeight) - previous).map(Quantity::fixed).into()
}

fn growth_rate(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let age = store.number(Key::AgeDays).trunc();
    if age == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    let gained = store.number(Key::CurrentWeight) - store.number(Key::SeedWeight);
    finite(gained / age).map(Quantity::fixed).into()
}

/// Weekly weight gain assumed by the projection, by current weight band.
pub fn weekly_gain(current: f64) -> f64 {
    if current >= 7.0 {
        3.0
    } else if current > 0.001 {
        2.5
    } else {
        0.0
    }
}

fn projected_weight(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    // Projection is only made alongside a growth rate.
    if store.number(Key::AgeDays).trunc() == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    let current = store.number(Key::CurrentWeight);
    finite(current + weekly_gain(current)).map(Quantity::fixed).into()
}

fn expected_growth(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let projected = store.number(Key::ProjectedWeight);
    let current = store.number(Key::CurrentWeight);
    if projected == 0.0 || current == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    Ok(Quantity::fixed(projected - current)).into()
}

fn consumption_density(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let feed = store.number(Key::FeedKg);
    let hectares = store.number(Key::Hectares);
    let weight = store.number(Key::CurrentWeight);
    if hectares <= 0.0 || weight <= 0.0 {
        return StepOutcome::Write(Err(StepError::InvalidInput));
    }

    ctx.reference
        .lookup(weight)
        .and_then(|fraction| {
            let raw = (feed / hectares) * 10.0 / (weight * fraction);
            finite(raw / ctx.options.density_calibration_divisor)
        })
        .map(Quantity::fixed)
        .into()
}

fn kg_per_100k(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let hectares = store.number(Key::Hectares);
    let density = store.number(Key::ConsumptionDensity);
    if hectares == 0.0 || density == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    let feed = store.number(Key::FeedKg);
    finite((feed / hectares) / density * 10.0).map(Quantity::fixed).into()
}

fn feed_sacks(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    finite(store.number(Key::FeedKg) / ctx.options.sack_weight_kg)
        .map(Quantity::fixed)
        .into()
}

/// Feed for one day at `weight`, before rounding to the ration step.
fn daily_ration(ctx: &StepContext<'_>, store: &ValueStore, weight_key: Key) -> Result<f64, StepError> {
    let weight = store.number(weight_key);
    let hectares = store.number(Key::Hectares);
    let density = store.number(Key::BiologistDensity);
    if weight < 0.0 || hectares < 0.0 || density < 0.0 {
        return Err(StepError::InvalidInput);
    }

    let (weight, hectares, density) = (or_one(weight), or_one(hectares), or_one(density));
    let fraction = ctx.reference.lookup(weight)?;
    let population = density * 10_000.0 * hectares;
    finite((weight / 1000.0) * population * fraction)
}

fn sunday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let step = ctx.options.feed_rounding_step;
    daily_ration(ctx, store, Key::ProjectedWeight)
        .map(|raw| Quantity::integer((raw / step).floor() * step))
        .into()
}

fn monday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let step = ctx.options.feed_rounding_step;
    daily_ration(ctx, store, Key::CurrentWeight)
        .map(|raw| Quantity::integer((raw / step).round() * step))
        .into()
}

/// Linear ramp from Monday (offset 0) to Sunday (offset 6).
fn interpolate(ctx: &StepContext<'_>, store: &ValueStore, offset: f64) -> StepOutcome {
    let step = ctx.options.feed_rounding_step;
    let first = or_one(store.number(Key::Monday));
    let last = or_one(store.number(Key::Sunday));
    let value = first + (last - first) / 6.0 * offset;
    finite((value / step).round() * step).map(Quantity::integer).into()
}

fn tuesday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    interpolate(ctx, store, 1.0)
}

fn wednesday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    interpolate(ctx, store, 2.0)
}

fn thursday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    interpolate(ctx, store, 3.0)
}

fn friday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    interpolate(ctx, store, 4.0)
}

fn saturday(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    interpolate(ctx, store, 5.0)
}

fn weekly_average(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let total: f64 = Key::WEEK.iter().map(|key| or_one(store.number(*key))).sum();
    Ok(Quantity::fixed(total / 7.0)).into()
}

fn weekly_cumulative(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    Ok(Quantity::fixed(or_one(store.number(Key::WeeklyAverage)) * 7.0)).into()
}

fn diesel_aerators(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let hectares = store.number(Key::Hectares);
    if hectares == 0.0 {
        return StepOutcome::Write(Err(StepError::DivisionByZero));
    }
    let aerators = store.number(Key::MechanicalAerators);
    finite(aerators * ctx.options.diesel_factor / hectares).map(Quantity::fixed).into()
}

fn aeration_capacity(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let diesel = store.number(Key::DieselAerators);
    let hectares = store.number(Key::Hectares);
    let options = ctx.options;
    Ok(Quantity::fixed(
        diesel * options.capacity_per_diesel_aerator_lbs + options.base_capacity_per_ha_lbs * hectares,
    ))
    .into()
}

fn lbs_ha_field(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let lbs = store.number(Key::BiologistDensity) * store.number(Key::CurrentWeight) * ctx.options.lbs_per_ha_factor;
    Ok(Quantity::fixed(lbs)).into()
}

fn lbs_ha_consumption(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let lbs =
        store.number(Key::ConsumptionDensity) * store.number(Key::CurrentWeight) * ctx.options.lbs_per_ha_factor;
    Ok(Quantity::fixed(lbs)).into()
}

fn total_lbs_field(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    Ok(Quantity::grouped(store.number(Key::LbsHaField) * store.number(Key::Hectares))).into()
}

fn total_lbs_consumption(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    Ok(Quantity::grouped(store.number(Key::LbsHaConsumption) * store.number(Key::Hectares))).into()
}

fn tray_lbs(store: &ValueStore, per_hectare: Key) -> StepOutcome {
    let feeders = store.number(Key::FeederCount);
    if feeders == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    let total = store.number(per_hectare) * store.number(Key::Hectares);
    Ok(Quantity::fixed(total / feeders)).into()
}

fn tray_lbs_field(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    tray_lbs(store, Key::LbsHaField)
}

fn tray_lbs_consumption(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    tray_lbs(store, Key::LbsHaConsumption)
}

fn hp_per_hectare(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let hectares = store.number(Key::Hectares);
    if hectares == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    let hp = store.number(Key::MechanicalAerators) * ctx.options.aerator_hp;
    finite(hp / (hectares * ctx.options.maintenance_factor))
        .map(Quantity::fixed)
        .into()
}

fn conversion_ratio(store: &ValueStore, total: Key) -> StepOutcome {
    let fed = store.number(Key::CumulativeFeedLbs);
    let produced = store.number(total);
    if fed == 0.0 || produced == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    Ok(Quantity::fixed(fed / produced)).into()
}

fn fca_field(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    conversion_ratio(store, Key::TotalLbsField)
}

fn fca_consumption(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    conversion_ratio(store, Key::TotalLbsConsumption)
}

fn yield_lbs_per_sack(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let feed = store.number(Key::FeedKg);
    if feed == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    let total = store.number(Key::LbsHaField) * store.number(Key::Hectares);
    finite(total / (feed / ctx.options.sack_weight_kg))
        .map(Quantity::fixed)
        .into()
}

fn recommended_lbs(ctx: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let lbs = ctx.options.recommended_capacity_per_ha_lbs * store.number(Key::Hectares);
    Ok(Quantity::grouped(lbs)).into()
}

fn density_difference(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let biologist = store.number(Key::BiologistDensity);
    let consumption_known = store.contains(Key::ConsumptionDensity) && store.failure(Key::ConsumptionDensity).is_none();
    if biologist == 0.0 || !consumption_known {
        return Ok(Quantity::integer(0.0)).into();
    }
    let consumption = store.number(Key::ConsumptionDensity);
    finite((consumption / biologist - 1.0) * 100.0)
        .map(Quantity::integer)
        .into()
}

fn lbs_per_aerator(_: &StepContext<'_>, store: &ValueStore) -> StepOutcome {
    let aerators = store.number(Key::MechanicalAerators);
    if aerators == 0.0 {
        return Ok(Quantity::fixed(0.0)).into();
    }
    Ok(Quantity::grouped(store.number(Key::TotalLbsField) / aerators)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;
    use crate::store::Entry;
    use pondfeed_schemas::sample::FieldValue;

    fn create_test_store(values: &[(Key, f64)]) -> ValueStore {
        let mut store = ValueStore::new();
        for (key, value) in values {
            store.set(*key, Entry::Input(FieldValue::Number(*value)));
        }
        store
    }

    fn eval(step: fn(&StepContext<'_>, &ValueStore) -> StepOutcome, store: &ValueStore) -> StepOutcome {
        let reference = ReferenceData::fallback().harvest;
        let options = CalculationOptions::default();
        let ctx = StepContext { reference: &reference, options: &options };
        step(&ctx, store)
    }

    fn rendered(outcome: StepOutcome) -> String {
        match outcome {
            StepOutcome::Write(Ok(q)) => q.render(),
            StepOutcome::Write(Err(e)) => e.sentinel().to_string(),
            StepOutcome::Skip => "<skip>".to_string(),
        }
    }

    #[test]
    fn age_counts_seeding_day() {
        let mut store = ValueStore::new();
        store.set(Key::SeedingDate, Entry::Input("10/10/2024".into()));
        store.set(Key::SamplingDate, Entry::Input("10/12/2024".into()));
        assert_eq!(rendered(eval(age, &store)), "62");
    }

    #[test]
    fn age_skips_on_bad_or_inverted_dates() {
        let mut store = ValueStore::new();
        store.set(Key::SeedingDate, Entry::Input("10/12/2024".into()));
        store.set(Key::SamplingDate, Entry::Input("10/10/2024".into()));
        assert_eq!(eval(age, &store), StepOutcome::Skip);

        store.set(Key::SamplingDate, Entry::Input("2024-12-10".into()));
        assert_eq!(eval(age, &store), StepOutcome::Skip);

        assert_eq!(eval(age, &ValueStore::new()), StepOutcome::Skip);
    }

    #[test]
    fn projected_weight_bands() {
        assert_eq!(weekly_gain(0.0005), 0.0);
        assert_eq!(weekly_gain(3.0), 2.5);
        assert_eq!(weekly_gain(7.0), 3.0);
        assert_eq!(weekly_gain(30.0), 3.0);

        let store = create_test_store(&[(Key::CurrentWeight, 30.0), (Key::AgeDays, 62.0)]);
        assert_eq!(rendered(eval(projected_weight, &store)), "33.00");

        let store = create_test_store(&[(Key::CurrentWeight, 30.0)]);
        assert_eq!(rendered(eval(projected_weight, &store)), "0.00");
    }

    #[test]
    fn consumption_density_sentinels() {
        let store = create_test_store(&[(Key::FeedKg, 614.0), (Key::CurrentWeight, 30.0)]);
        assert_eq!(rendered(eval(consumption_density, &store)), "Datos inválidos");

        let store = create_test_store(&[(Key::FeedKg, 614.0), (Key::Hectares, 7.8), (Key::CurrentWeight, 0.05)]);
        assert_eq!(rendered(eval(consumption_density, &store)), "Error");

        let store = create_test_store(&[(Key::FeedKg, 614.0), (Key::Hectares, 7.8), (Key::CurrentWeight, 30.0)]);
        assert_eq!(rendered(eval(consumption_density, &store)), "10.15");
    }

    #[test]
    fn empty_reference_table_reports_no_data() {
        let store = create_test_store(&[(Key::FeedKg, 614.0), (Key::Hectares, 7.8), (Key::CurrentWeight, 30.0)]);
        let reference = ReferenceTable::default();
        let options = CalculationOptions::default();
        let ctx = StepContext { reference: &reference, options: &options };
        assert_eq!(rendered(consumption_density(&ctx, &store)), "No hay datos");
        assert_eq!(rendered(monday(&ctx, &store)), "No hay datos");
    }

    #[test]
    fn monday_rounds_and_sunday_floors() {
        let store = create_test_store(&[
            (Key::CurrentWeight, 30.0),
            (Key::ProjectedWeight, 33.0),
            (Key::Hectares, 7.8),
            (Key::BiologistDensity, 11.0),
        ]);
        // 665.4 rounds up to 675; 1493.4 floors to 1475.
        assert_eq!(rendered(eval(monday, &store)), "675");
        assert_eq!(rendered(eval(sunday, &store)), "1475");
    }

    #[test]
    fn negative_daily_inputs_are_invalid() {
        let store = create_test_store(&[(Key::CurrentWeight, 30.0), (Key::Hectares, -1.0)]);
        assert_eq!(rendered(eval(monday, &store)), "Datos inválidos");
    }

    #[test]
    fn interpolation_between_monday_and_sunday() {
        let store = create_test_store(&[(Key::Monday, 25.0), (Key::Sunday, 425.0)]);
        let steps: [fn(&StepContext<'_>, &ValueStore) -> StepOutcome; 5] =
            [tuesday, wednesday, thursday, friday, saturday];
        let days: Vec<String> = steps
            .iter()
            .map(|f| rendered(eval(*f, &store)))
            .collect();
        assert_eq!(days, vec!["100", "150", "225", "300", "350"]);
    }

    #[test]
    fn division_guards() {
        let store = create_test_store(&[(Key::FeedKg, 614.0), (Key::ConsumptionDensity, 10.15)]);
        assert_eq!(rendered(eval(kg_per_100k, &store)), "0.00");
        assert_eq!(rendered(eval(hp_per_hectare, &store)), "0.00");
        assert_eq!(rendered(eval(diesel_aerators, &store)), "Error");

        let store = create_test_store(&[(Key::LbsHaField, 7260.0), (Key::Hectares, 7.8)]);
        assert_eq!(rendered(eval(tray_lbs_field, &store)), "0.00");
        assert_eq!(rendered(eval(lbs_per_aerator, &store)), "0.00");

        let store = create_test_store(&[(Key::ConsumptionDensity, 10.15)]);
        assert_eq!(rendered(eval(density_difference, &store)), "0");
    }

    #[test]
    fn density_difference_ignores_failed_consumption() {
        let mut store = create_test_store(&[(Key::BiologistDensity, 11.0)]);
        store.set(Key::ConsumptionDensity, Entry::Failed(StepError::LookupMiss));
        assert_eq!(rendered(eval(density_difference, &store)), "0");

        store.set(Key::ConsumptionDensity, Entry::Input(FieldValue::Number(10.15)));
        assert_eq!(rendered(eval(density_difference, &store)), "-8");
    }

    #[test]
    fn weekly_totals_default_zero_days_to_one() {
        let store = ValueStore::new();
        assert_eq!(rendered(eval(weekly_average, &store)), "1.00");
        assert_eq!(rendered(eval(weekly_cumulative, &store)), "7.00");
    }
}
