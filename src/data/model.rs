use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Record – one country/year observation
// ---------------------------------------------------------------------------

/// A single country-year temperature change observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub continent: String,
    pub year: i32,
    /// Temperature delta in °C, signed.
    pub value: f64,
}

impl Record {
    pub fn new(
        country: impl Into<String>,
        continent: impl Into<String>,
        year: i32,
        value: f64,
    ) -> Self {
        Record {
            country: country.into(),
            continent: continent.into(),
            year,
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// ContinentSeries – mean value per year for one continent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub mean: f64,
}

/// Per-continent yearly means, ascending by year with at most one point per year.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentSeries {
    pub continent: String,
    pub points: Vec<YearPoint>,
}

// ---------------------------------------------------------------------------
// TemperatureDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All records of one session plus indices used by the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct TemperatureDataset {
    /// Records in file order; never mutated after load.
    pub records: Vec<Record>,
    /// Sorted unique continents.
    pub continents: BTreeSet<String>,
    /// Continent → sorted unique countries.
    pub countries: BTreeMap<String, BTreeSet<String>>,
    /// Sorted unique years.
    pub years: BTreeSet<i32>,
    /// Rows dropped by the loader because they were malformed.
    pub skipped: usize,
}

impl TemperatureDataset {
    /// Build lookup indices from the loaded records.
    pub fn from_records(records: Vec<Record>, skipped: usize) -> Self {
        let mut continents = BTreeSet::new();
        let mut countries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut years = BTreeSet::new();

        for rec in &records {
            continents.insert(rec.continent.clone());
            countries
                .entry(rec.continent.clone())
                .or_default()
                .insert(rec.country.clone());
            years.insert(rec.year);
        }

        TemperatureDataset {
            records,
            continents,
            countries,
            years,
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indices_are_built_from_records() {
        let ds = TemperatureDataset::from_records(
            vec![
                Record::new("Chile", "South America", 1990, 0.4),
                Record::new("Peru", "South America", 1991, 0.2),
                Record::new("Kenya", "Africa", 1990, 0.9),
            ],
            2,
        );

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.skipped, 2);
        assert_eq!(
            ds.continents.iter().cloned().collect::<Vec<_>>(),
            vec!["Africa".to_string(), "South America".to_string()]
        );
        assert_eq!(ds.countries["South America"].len(), 2);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![1990, 1991]);
    }
}
