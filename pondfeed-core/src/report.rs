use pondfeed_schemas::analysis::Analysis;

const PROBLEMS_HEADER: &str = "🚨 **PROBLEMAS IDENTIFICADOS:**";
const RECOMMENDATIONS_HEADER: &str = "✅ **RECOMENDACIONES OPERATIVAS:**";
const OBSERVATIONS_HEADER: &str = "🔍 **OBSERVACIONES:**";

/// Renders an analysis as numbered sections. Empty categories are left out
/// and an empty analysis renders as an empty string.
pub fn generate_report(analysis: &Analysis) -> String {
    [
        (PROBLEMS_HEADER, &analysis.problems),
        (RECOMMENDATIONS_HEADER, &analysis.recommendations),
        (OBSERVATIONS_HEADER, &analysis.observations),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(header, items)| section(header, items))
    .collect::<Vec<_>>()
    .join("\n\n\n")
}

fn section(header: &str, items: &[String]) -> String {
    std::iter::once(header.to_string())
        .chain(items.iter().enumerate().map(|(i, item)| format!("{}. {item}", i + 1)))
        .collect::<Vec<_>>()
        .join("\n\n")
}
