use approx::assert_relative_eq;
use pondfeed_core::{
    diagnostics::DiagnosticAnalyzer, report::generate_report, service::SUCCESS_MESSAGE, FeedingService,
};
use pondfeed_schemas::{
    record::DateCheck,
    response::{FeedingReport, FeedingResponse},
    sample::Sample,
};
use pretty_assertions::assert_eq;

fn create_test_sample() -> Sample {
    let body = r#"{
        "finca": "CAMANOVILLO",
        "Hectareas": 7.8,
        "Piscinas": 5,
        "Fechadesiembra": "10/10/2024",
        "Fechademuestreo": "10/12/2024",
        "Pesoanterior": 23.33,
        "Pesoactualgdia": 30,
        "Densidadbiologoindm2": 11,
        "AcumuladoactualLBS": "55,042",
        "numeroAA": 4,
        "Aireadores": 8,
        "Alimentoactualkg": 614,
        "Densidadatarraya": 10,
        "VersionApp": "2.1.0"
    }"#;
    serde_json::from_str(body).unwrap()
}

fn run(sample: &Sample) -> FeedingReport {
    let service = FeedingService::with_defaults().unwrap();
    match service.process(sample) {
        FeedingResponse::Success(report) => *report,
        FeedingResponse::Error(failure) => panic!("unexpected failure: {}", failure.error),
    }
}

#[test]
fn reference_pond_produces_documented_values() {
    let report = run(&create_test_sample());
    let r = &report.results;

    assert_eq!(report.message, SUCCESS_MESSAGE);
    assert_relative_eq!(r.age_days, 62.0);
    assert_relative_eq!(r.weight_increment, 6.67);
    assert_relative_eq!(r.growth_rate, 0.47);
    assert_eq!(r.projected_weight, "33.00");
    assert_eq!(r.expected_growth, "3.00");

    assert_relative_eq!(r.consumption_density, 10.15);
    assert_eq!(r.kg_per_100k, "77.55");
    assert_relative_eq!(r.feed_sacks, 24.56);

    let week = [r.monday, r.tuesday, r.wednesday, r.thursday, r.friday, r.saturday, r.sunday];
    assert_eq!(week, [675.0, 800.0, 950.0, 1075.0, 1200.0, 1350.0, 1475.0]);
    assert_relative_eq!(r.weekly_average, 1075.0);
    assert_relative_eq!(r.weekly_cumulative, 7525.0);

    assert_eq!(r.diesel_aerators, "3.08");
    assert_eq!(r.aeration_capacity, "67740.00");
    assert_relative_eq!(r.lbs_ha_field, 7260.0);
    assert_relative_eq!(r.lbs_ha_consumption, 6699.0);
    assert_eq!(r.total_lbs_field, "56,628.00");
    assert_relative_eq!(r.total_lbs_consumption, 52252.2);
    assert_eq!(r.tray_lbs_field, "14157.00");
    assert_eq!(r.tray_lbs_consumption, "13063.05");
    assert_eq!(r.hp_per_hectare, "16.41");
    assert_eq!(r.fca_field, "0.97");
    assert_eq!(r.fca_consumption, "1.05");
    assert_eq!(r.yield_lbs_per_sack, "2305.70");
    assert_eq!(r.recommended_lbs, "54,600.00");
    assert_eq!(r.density_difference, "-8");
    assert_eq!(r.lbs_per_aerator, "7,078.50");
}

#[test]
fn reference_pond_metadata_and_cross_checks() {
    let report = run(&create_test_sample());

    let validations = &report.metadata.validations;
    assert!(validations.dates.valid);
    assert_eq!(validations.dates.cultivation_days, Some(62));
    assert_eq!(report.metadata.version_app.as_deref(), Some("2.1.0"));
    assert_eq!(report.metadata.calculated_fields["libras_totales_campo"], "56,628.00");

    match &report.results.cross_validation.dates {
        Some(DateCheck::Checked { computed_age, consistent, .. }) => {
            assert_eq!(*computed_age, 62);
            assert!(consistent);
        }
        other => panic!("unexpected date check: {other:?}"),
    }

    let densities = report.results.cross_validation.densities.as_ref().unwrap();
    assert!(densities.acceptable);
}

#[test]
fn reference_pond_analysis() {
    let report = run(&create_test_sample());
    let analysis = &report.analysis;

    assert_eq!(analysis.problems.len(), 2);
    assert!(analysis.problems[0].starts_with("CRECIMIENTO LENTO (0.47 g/día)"));
    assert!(analysis.problems[1].starts_with("SOBREALIMENTACIÓN DETECTADA (2.4% de biomasa)"));
    assert_eq!(analysis.recommendations.len(), 2);
    assert_eq!(analysis.observations.len(), 1);
    assert!(analysis.observations[0].starts_with("CAPACIDAD DE AIREACIÓN ALERTA (83.6%)"));

    let text = generate_report(analysis);
    assert!(text.starts_with("🚨 **PROBLEMAS IDENTIFICADOS:**"));
    assert!(text.contains("✅ **RECOMENDACIONES OPERATIVAS:**"));
    assert!(text.contains("🔍 **OBSERVACIONES:**"));
}

#[test]
fn saved_record_reanalyzes_identically() {
    let report = run(&create_test_sample());
    let saved = serde_json::to_value(&report.results).unwrap();
    let map = saved.as_object().unwrap();

    let reanalyzed = DiagnosticAnalyzer::default().analyze_map(map);
    assert_eq!(reanalyzed, report.analysis);
}

#[test]
fn repeated_runs_are_identical() {
    let sample = create_test_sample();
    let first = run(&sample);
    let second = run(&sample);

    assert_eq!(first.results, second.results);
    assert_eq!(first.analysis, second.analysis);
    assert_eq!(first.metadata.calculated_fields, second.metadata.calculated_fields);
}

#[test]
fn zero_area_pond_keeps_running() {
    let mut sample = create_test_sample();
    sample.hectares = None;
    sample.pond = Some("99".into());

    let service = FeedingService::with_defaults().unwrap();
    let (response, trace) = service.process_traced(&sample);
    let FeedingResponse::Success(report) = response else {
        panic!("a missing pond area must not abort the run");
    };

    assert_eq!(trace.len(), 32);
    assert!(trace.failures().count() > 0);
    assert_eq!(report.results.kg_per_100k, "0.00");
    assert_eq!(report.results.diesel_aerators, "Error");
    assert_eq!(report.metadata.calculated_fields["densidad_consumo_im2"], "Datos inválidos");
}

#[test]
fn empty_farm_returns_error_status() {
    let mut sample = create_test_sample();
    sample.farm = String::new();

    let response = FeedingService::with_defaults().unwrap().process(&sample);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["datos_recibidos"]["Pesoactualgdia"], 30.0);
}
