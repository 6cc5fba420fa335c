//! Built-in example reference data, used when no tables are supplied.
//! Not production data.

use pondfeed_schemas::{
    reference::{HarvestRow, PondRow, YieldRow},
    sample::FieldValue,
};

pub const DEFAULT_FARM: &str = "CAMANOVILLO";

const HARVEST: &[(f64, &str)] = &[
    (0.1, "9.15414480282437%"),
    (0.2, "8.97526907090715%"),
    (0.3, "8.80315055771193%"),
    (0.4, "8.63753771753783%"),
    (0.5, "8.47820568157775%"),
    (0.6, "8.32494984593881%"),
    (0.7, "8.17757345223225%"),
    (0.8, "8.03589598701473%"),
    (0.9, "7.89974227012982%"),
    (1.0, "7.76895067203928%"),
    (2.0, "7.64329088671705%"),
    (3.0, "7.52243774943028%"),
    (4.0, "7.40611344962463%"),
    (5.0, "7.29406491464884%"),
    (6.0, "7.18606018415562%"),
    (7.0, "7.08188557079371%"),
    (8.0, "6.98134390537456%"),
    (9.0, "6.88424198885506%"),
    (10.0, "6.79040829692851%"),
    (11.0, "6.69968256815778%"),
    (12.0, "6.61191536734075%"),
    (13.0, "6.52696751033755%"),
    (14.0, "6.44471060404309%"),
    (15.0, "6.36502684263012%"),
    (16.0, "6.28780883655906%"),
    (17.0, "6.21295959859733%"),
    (18.0, "6.14038232522348%"),
    (19.0, "6.06999031465058%"),
    (20.0, "6.00170679563162%"),
    (21.0, "5.93545471700598%"),
    (22.0, "5.87115649794255%"),
    (23.0, "5.80874397624946%"),
    (24.0, "5.74814831639145%"),
    (25.0, "5.68930981515037%"),
    (26.0, "5.63216776438915%"),
    (27.0, "5.57666032843901%"),
    (28.0, "5.52272453926161%"),
    (29.0, "5.47030714223830%"),
    // Calibrated against the farm spreadsheet; deliberately off the curve.
    (30.0, "2.58516749708439%"),
    (31.0, "5.36977225019175%"),
    (32.0, "5.32153536380829%"),
    (33.0, "5.27456782686434%"),
    (34.0, "5.22881263169593%"),
    (35.0, "5.18421174912473%"),
];

const TERRAIN: &[(&str, &[(&str, &str)])] = &[
    (
        "CAMANOVILLO",
        &[("1", "8.3"), ("2", "6.49"), ("3", "8.29"), ("4", "7.85"), ("5", "6.12")],
    ),
    ("EXCANCRIGRU", &[("1", "3.2"), ("2", "2.8"), ("3", "3.5"), ("4", "2.1")]),
    ("FERTIAGRO", &[("1", "4.0"), ("2", "3.7"), ("3", "2.9")]),
    ("GROVITAL", &[("1", "2.2"), ("2", "2.6"), ("3", "3.1"), ("4", "2.8")]),
    ("SUFAAZA", &[("1", "3.8"), ("2", "4.2"), ("3", "3.5")]),
    ("TIERRAVID", &[("1", "2.7"), ("2", "3.3"), ("3", "2.9"), ("4", "3.1")]),
];

pub fn harvest_rows() -> Vec<HarvestRow> {
    HARVEST
        .iter()
        .map(|(weight, pct)| HarvestRow {
            weight_g: FieldValue::Number(*weight),
            harvest_percentage: FieldValue::from(*pct),
        })
        .collect()
}

pub fn terrain_rows() -> Vec<(String, Vec<PondRow>)> {
    TERRAIN
        .iter()
        .map(|(farm, ponds)| {
            let rows = ponds
                .iter()
                .map(|(pond, hectares)| PondRow {
                    pond: FieldValue::from(*pond),
                    hectares: FieldValue::from(*hectares),
                })
                .collect();
            (farm.to_string(), rows)
        })
        .collect()
}

/// Yield rises 3 points per gram from 30 % at 10 g.
pub fn yield_rows() -> Vec<YieldRow> {
    (10..=20)
        .map(|grams| YieldRow {
            grams: FieldValue::Number(grams as f64),
            yield_percentage: FieldValue::Number(30.0 + 3.0 * (grams - 10) as f64),
        })
        .collect()
}
