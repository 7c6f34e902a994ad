use std::collections::BTreeSet;

use super::model::Record;

// ---------------------------------------------------------------------------
// Region filter: which continent and which countries to leave out
// ---------------------------------------------------------------------------

/// Continent restriction plus a named exclusion list.
/// `continent == None` means every continent passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFilter {
    pub continent: Option<String>,
    pub excluded: BTreeSet<String>,
}

impl RegionFilter {
    /// Whether a single record passes the filter.
    pub fn matches(&self, rec: &Record) -> bool {
        if let Some(continent) = &self.continent {
            if rec.continent != *continent {
                return false;
            }
        }
        !self.excluded.contains(&rec.country)
    }

    /// Add or remove a country from the exclusion list.
    pub fn toggle_excluded(&mut self, country: &str) {
        if !self.excluded.remove(country) {
            self.excluded.insert(country.to_string());
        }
    }

    /// Records passing the filter, in input order.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        match &self.continent {
            Some(continent) => filter_region(records, continent, &self.excluded),
            None => records
                .iter()
                .filter(|rec| self.matches(rec))
                .cloned()
                .collect(),
        }
    }
}

/// Return the records of `continent` whose country is not in `excluded`,
/// preserving input order.
pub fn filter_region(
    records: &[Record],
    continent: &str,
    excluded: &BTreeSet<String>,
) -> Vec<Record> {
    records
        .iter()
        .filter(|rec| rec.continent == continent && !excluded.contains(&rec.country))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records() -> Vec<Record> {
        vec![
            Record::new("Brazil", "South America", 2000, 0.5),
            Record::new("Kenya", "Africa", 2000, 0.7),
            Record::new("Falkland Islands (Malvinas)", "South America", 2000, 0.1),
            Record::new("Chile", "South America", 2000, -0.2),
        ]
    }

    #[test]
    fn keeps_continent_and_drops_excluded_in_order() {
        let excluded: BTreeSet<String> =
            ["Falkland Islands (Malvinas)".to_string()].into_iter().collect();
        let out = filter_region(&records(), "South America", &excluded);
        let names: Vec<&str> = out.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Brazil", "Chile"]);
    }

    #[test]
    fn unknown_continent_yields_nothing() {
        assert!(filter_region(&records(), "Antarctica", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn region_filter_matches_free_function() {
        let filter = RegionFilter {
            continent: Some("South America".into()),
            excluded: ["Falkland Islands (Malvinas)".to_string()].into(),
        };
        assert_eq!(
            filter.apply(&records()),
            filter_region(&records(), "South America", &filter.excluded)
        );
    }

    #[test]
    fn no_continent_passes_everything_not_excluded() {
        let mut filter = RegionFilter::default();
        assert_eq!(filter.apply(&records()).len(), 4);

        filter.toggle_excluded("Kenya");
        assert_eq!(filter.apply(&records()).len(), 3);
        filter.toggle_excluded("Kenya");
        assert!(filter.excluded.is_empty());
    }
}
