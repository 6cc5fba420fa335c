//! Charts for a single feeding result.

use anyhow::Result;
use plotters::prelude::*;
use pondfeed_core::normalize::parse_rendered;
use pondfeed_schemas::record::ResultRecord;
use std::path::Path;
use tracing::info;

const DAY_LABELS: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

pub fn generate_all_plots(output_dir: &Path, prefix: &str, record: &ResultRecord) -> Result<()> {
    plot_feeding_schedule(output_dir, prefix, record)?;
    plot_biomass_comparison(output_dir, prefix, record)?;
    info!(dir = %output_dir.display(), prefix, "charts saved");
    Ok(())
}

/// Bar chart of the seven daily rations with the weekly average as a line.
fn plot_feeding_schedule(output_dir: &Path, prefix: &str, record: &ResultRecord) -> Result<()> {
    let path = output_dir.join(format!("{prefix}_feeding_schedule.png"));
    let root = BitMapBackend::new(&path, (1024, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let week = [
        record.monday,
        record.tuesday,
        record.wednesday,
        record.thursday,
        record.friday,
        record.saturday,
        record.sunday,
    ];
    let max_ration = week.iter().copied().fold(record.weekly_average, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Ración semanal - piscina {}", record.pond),
            ("sans-serif", 36).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..6u32).into_segmented(), 0f64..max_ration * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Día")
        .y_desc("Alimento (kg)")
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(day) => DAY_LABELS.get(*day as usize).copied().unwrap_or("").to_string(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(12)
            .data(week.iter().enumerate().map(|(day, ration)| (day as u32, *ration))),
    )?;

    chart
        .draw_series(LineSeries::new(
            (0u32..=6u32).map(|day| (SegmentValue::CenterOf(day), record.weekly_average)),
            RED.stroke_width(2),
        ))?
        .label(format!("Promedio {:.0} kg", record.weekly_average))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Field and consumption biomass estimates against the aeration capacity.
fn plot_biomass_comparison(output_dir: &Path, prefix: &str, record: &ResultRecord) -> Result<()> {
    let path = output_dir.join(format!("{prefix}_biomass_comparison.png"));
    let root = BitMapBackend::new(&path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let field = parse_rendered(&record.total_lbs_field);
    let consumption = record.total_lbs_consumption;
    let capacity = parse_rendered(&record.aeration_capacity);
    let max_lbs = field.max(consumption).max(capacity).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Biomasa estimada (lbs)", ("sans-serif", 36).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((0u32..1u32).into_segmented(), 0f64..max_lbs * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Libras")
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(0) => "Campo".to_string(),
            SegmentValue::CenterOf(1) => "Consumo".to_string(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(GREEN.mix(0.7).filled())
            .margin(40)
            .data([(0u32, field)]),
    )?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(CYAN.mix(0.7).filled())
            .margin(40)
            .data([(1u32, consumption)]),
    )?;

    if capacity > 0.0 {
        chart
            .draw_series(LineSeries::new(
                [(SegmentValue::Exact(0u32), capacity), (SegmentValue::Last, capacity)],
                RED.stroke_width(2),
            ))?
            .label(format!("Capacidad de aireación {:.0} lbs", capacity))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
