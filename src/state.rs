use std::collections::BTreeSet;
use std::ops::Bound;
use std::path::Path;

use crate::color::ColorMap;
use crate::config::ChartConfig;
use crate::data::aggregate::{build_continent_series, build_year_slice};
use crate::data::filter::RegionFilter;
use crate::data::loader::load_file;
use crate::data::model::{ContinentSeries, Record, TemperatureDataset};
use crate::selection::{BandLayout, Brush, SelectionStats, compute_stats};

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Continent means over time.
    LineChart,
    /// One year of the selected region, with brushing.
    BarChart,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// Every setter recomputes the derived data it affects from scratch, so the
/// fields below are always consistent with each other between frames.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<TemperatureDataset>,

    pub config: ChartConfig,

    /// Continent and exclusions used by the bar chart.
    pub region: RegionFilter,

    /// Continent asked for by config or the user; `region.continent` falls
    /// back to all continents when a dataset lacks it.
    preferred_region: Option<String>,

    /// Continent means for the line chart (all continents).
    pub series: Vec<ContinentSeries>,

    /// Records passing `region`, in file order.
    region_records: Vec<Record>,

    /// Years present in `region_records`.
    region_years: BTreeSet<i32>,

    /// Year shown in the bar chart.
    pub year: Option<i32>,

    /// Rows of `year` within the region, largest value first.
    pub slice: Vec<Record>,

    pub brush: Brush,

    /// Statistics over the brushed rows (or the whole slice).
    pub stats: SelectionStats,

    pub view: ViewMode,

    /// Whether the bar chart is stepping through the years.
    pub playing: bool,

    /// Continent colours for the line chart.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ChartConfig) -> Self {
        let region = RegionFilter {
            continent: config.region.clone(),
            excluded: config.excluded_countries.iter().cloned().collect(),
        };
        Self {
            dataset: None,
            preferred_region: config.region.clone(),
            config,
            region,
            series: Vec::new(),
            region_records: Vec::new(),
            region_years: BTreeSet::new(),
            year: None,
            slice: Vec::new(),
            brush: Brush::Idle,
            stats: SelectionStats::default(),
            view: ViewMode::LineChart,
            playing: false,
            color_map: None,
            status_message: None,
        }
    }

    pub fn layout(&self) -> BandLayout {
        self.config.layout()
    }

    /// Load a file and swap it in. On failure the current dataset stays and
    /// the error goes to the status line.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                if let Some(ds) = &self.dataset {
                    if ds.skipped > 0 {
                        self.status_message =
                            Some(format!("{} malformed rows skipped", ds.skipped));
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and rebuild everything derived from it.
    pub fn set_dataset(&mut self, dataset: TemperatureDataset) {
        self.series = build_continent_series(&dataset.records);
        self.color_map = Some(ColorMap::new(&dataset.continents));

        self.region.continent = match &self.preferred_region {
            Some(continent) if !dataset.continents.contains(continent) => {
                log::warn!("Region '{continent}' not in dataset, showing all continents");
                None
            }
            preferred => preferred.clone(),
        };

        self.dataset = Some(dataset);
        self.year = None;
        self.playing = false;
        self.brush.clear();
        self.status_message = None;
        self.refresh_region();
    }

    /// Switch the bar chart region. Clears the brush.
    pub fn set_region(&mut self, continent: Option<String>) {
        self.preferred_region = continent.clone();
        if self.region.continent == continent {
            return;
        }
        self.region.continent = continent;
        self.brush.clear();
        self.refresh_region();
    }

    /// Exclude or re-include one country. Clears the brush.
    pub fn toggle_excluded(&mut self, country: &str) {
        self.region.toggle_excluded(country);
        self.brush.clear();
        self.refresh_region();
    }

    /// Countries that can be excluded for the current region.
    pub fn region_countries(&self) -> Vec<String> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        match &self.region.continent {
            Some(continent) => ds
                .countries
                .get(continent)
                .map(|c| c.iter().cloned().collect())
                .unwrap_or_default(),
            None => ds
                .countries
                .values()
                .flatten()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    /// First and last year with data in the current region.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        Some((*self.region_years.first()?, *self.region_years.last()?))
    }

    /// Show `year` in the bar chart. An active brush keeps its position and
    /// is re-applied to the new rows.
    pub fn set_year(&mut self, year: i32) {
        self.year = Some(year);
        self.refresh_slice();
    }

    /// Advance to the next year with data, wrapping to the first.
    pub fn step_year(&mut self) {
        let next = match self.year {
            Some(current) => self
                .region_years
                .range((Bound::Excluded(current), Bound::Unbounded))
                .next()
                .or_else(|| self.region_years.first()),
            None => self.region_years.first(),
        };
        if let Some(&year) = next {
            self.set_year(year);
        }
    }

    pub fn begin_brush(&mut self, pos: f64) {
        self.brush.start(pos);
        self.recompute_stats();
    }

    pub fn drag_brush(&mut self, pos: f64) {
        self.brush.drag(pos);
        self.recompute_stats();
    }

    pub fn end_brush(&mut self) {
        self.brush.release();
        self.recompute_stats();
    }

    pub fn clear_brush(&mut self) {
        self.brush.clear();
        self.recompute_stats();
    }

    fn refresh_region(&mut self) {
        self.region_records = match &self.dataset {
            Some(ds) => self.region.apply(&ds.records),
            None => Vec::new(),
        };
        self.region_years = self.region_records.iter().map(|r| r.year).collect();

        let keep_year = self
            .year
            .is_some_and(|y| self.region_years.contains(&y));
        if !keep_year {
            self.year = self.region_years.first().copied();
        }
        self.refresh_slice();
    }

    fn refresh_slice(&mut self) {
        self.slice = match self.year {
            Some(year) => build_year_slice(&self.region_records, year),
            None => Vec::new(),
        };
        self.recompute_stats();
    }

    fn recompute_stats(&mut self) {
        let range = self.brush.range();
        self.stats = compute_stats(&self.slice, &self.layout(), range.as_ref());
    }
}
