//! Text rendering for results and the trend chart

use console::{style, Style};
use sepsafe::{Assessment, RiskBand, View};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Green / orange / red; terminals have no orange, so MODERATE is yellow
pub fn band_style(band: RiskBand) -> Style {
    match band {
        RiskBand::Low => Style::new().green(),
        RiskBand::Moderate => Style::new().yellow(),
        RiskBand::High => Style::new().red(),
    }
}

pub fn assessment(a: &Assessment) -> String {
    let s = band_style(a.band);
    format!(
        "{}\n{}\n{}",
        s.apply_to("━".repeat(40)),
        s.apply_to(format!(
            "Sepsis probability: {:.2}  [{}]",
            a.probability, a.band
        ))
        .bold(),
        s.apply_to(a.advisory())
    )
}

pub fn error(message: &str) -> String {
    style(format!("ERROR: {}", message)).red().to_string()
}

pub fn view(v: &View) -> Option<String> {
    match v {
        View::Empty => None,
        View::Result(a) => Some(assessment(a)),
        View::Error(msg) => Some(error(msg)),
    }
}

/// Sparkline of the history, oldest first, each point coloured by its band,
/// with the values listed underneath.
pub fn trend(points: &[f32]) -> Option<String> {
    if points.is_empty() {
        return None;
    }

    let marks: Vec<String> = points
        .iter()
        .map(|&p| {
            let level = ((p.clamp(0.0, 1.0) * 7.0).round() as usize).min(SPARK.len() - 1);
            let cell = format!("{:<5}", SPARK[level]);
            band_style(RiskBand::from_probability(p))
                .apply_to(cell)
                .to_string()
        })
        .collect();
    let values: Vec<String> = points.iter().map(|p| format!("{:<5.2}", p)).collect();

    Some(format!(
        "{}\n  {}\n  {}",
        style("Probability history").bold(),
        marks.concat().trim_end(),
        values.concat().trim_end()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    #[test]
    fn test_assessment_text() {
        let text = assessment(&Assessment::from_probability(0.4234));
        let plain = strip_ansi_codes(&text);
        assert!(plain.contains("Sepsis probability: 0.42  [LOW]"));
        assert!(plain.contains("Monitor the patient routinely."));
    }

    #[test]
    fn test_error_prefix() {
        let plain = strip_ansi_codes(&error("You must enter exactly 8 values")).to_string();
        assert_eq!(plain, "ERROR: You must enter exactly 8 values");
    }

    #[test]
    fn test_view_empty() {
        assert!(view(&View::Empty).is_none());
    }

    #[test]
    fn test_trend_chart() {
        assert!(trend(&[]).is_none());

        let chart = trend(&[0.0, 0.5, 1.0]).unwrap();
        let plain = strip_ansi_codes(&chart).to_string();
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines[0], "Probability history");
        assert_eq!(lines[1].trim(), "▁    ▅    █");
        assert_eq!(lines[2].trim(), "0.00 0.50 1.00");
    }
}
