use std::collections::BTreeMap;

use super::model::{ContinentSeries, Record, YearPoint};

// ---------------------------------------------------------------------------
// Continent series (line chart)
// ---------------------------------------------------------------------------

/// Group records by continent and year and average each group.
///
/// Continents come out in name order, each series ascending by year.
/// Years without records are absent, never zero-filled.
pub fn build_continent_series(records: &[Record]) -> Vec<ContinentSeries> {
    // continent → year → (sum, count)
    let mut groups: BTreeMap<&str, BTreeMap<i32, (f64, usize)>> = BTreeMap::new();
    for rec in records {
        let slot = groups
            .entry(rec.continent.as_str())
            .or_default()
            .entry(rec.year)
            .or_insert((0.0, 0));
        slot.0 += rec.value;
        slot.1 += 1;
    }

    groups
        .into_iter()
        .map(|(continent, years)| ContinentSeries {
            continent: continent.to_string(),
            points: years
                .into_iter()
                .map(|(year, (sum, count))| YearPoint {
                    year,
                    mean: sum / count as f64,
                })
                .collect(),
        })
        .filter(|series| !series.points.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Year slice (bar chart)
// ---------------------------------------------------------------------------

/// Records of `year`, largest value first. Equal values keep input order.
pub fn build_year_slice(records: &[Record], year: i32) -> Vec<Record> {
    let mut slice: Vec<Record> = records.iter().filter(|r| r.year == year).cloned().collect();
    // sort_by is stable
    slice.sort_by(|a, b| b.value.total_cmp(&a.value));
    slice
}

/// Smallest and largest year, `None` for no records.
pub fn year_extent(records: &[Record]) -> Option<(i32, i32)> {
    let min = records.iter().map(|r| r.year).min()?;
    let max = records.iter().map(|r| r.year).max()?;
    Some((min, max))
}

/// Smallest and largest value, `None` for no records.
pub fn value_extent(records: &[Record]) -> Option<(f64, f64)> {
    if records.is_empty() {
        return None;
    }
    let min = records.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
    let max = records.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
