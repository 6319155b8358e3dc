use crate::utils::error::{Result, ScoutError};
use std::collections::{BTreeMap, HashMap};

/// Expected market price per (model, year). Looked up by exact model name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    models: HashMap<String, BTreeMap<i32, u32>>,
}

// Reference prices at a maximum of 10,000 miles.
const BUILTIN_PRICES: &[(&str, &[(i32, u32)])] = &[
    (
        "Yamaha YZF-R1",
        &[
            (2017, 10445), (2018, 11550), (2019, 12360), (2020, 12460), (2021, 12825),
            (2022, 12960), (2023, 13435), (2024, 14745), (2025, 15360),
        ],
    ),
    (
        "Honda CBR1000rr",
        &[
            (2017, 8390), (2018, 9540), (2019, 10175), (2020, 10500), (2021, 11030),
            (2022, 11545), (2023, 12010), (2024, 12315), (2025, 12830),
        ],
    ),
    (
        "Suzuki GSXR 1000r ABS",
        &[
            (2017, 10310), (2018, 10310), (2019, 10665), (2020, 11110), (2021, 11570),
            (2022, 12000), (2023, 12630), (2024, 13300), (2025, 13845),
        ],
    ),
    (
        "Suzuki GSXR 1000",
        &[
            (2017, 8110), (2018, 8885), (2019, 9570), (2020, 10240), (2021, 10515),
            (2022, 10730), (2023, 11225), (2024, 11865), (2025, 12360),
        ],
    ),
    (
        "Kawasaki Ninja ZX10R ABS",
        &[
            (2017, 8500), (2018, 8875), (2019, 9270), (2020, 10125), (2021, 11085),
            (2022, 11680), (2023, 13435), (2024, 14010), (2025, 14750),
        ],
    ),
    (
        "Kawasaki Ninja ZX10R",
        &[
            (2017, 7980), (2018, 8330), (2019, 8670), (2020, 9680), (2021, 10460),
            (2022, 11680), (2023, 12700), (2024, 13450), (2025, 14750),
        ],
    ),
    (
        "Kawasaki Ninja ZX6r ABS",
        &[
            (2017, 6640), (2018, 6925), (2019, 6755), (2020, 7340), (2021, 7400),
            (2022, 8135), (2023, 8765), (2024, 9615), (2025, 10015),
        ],
    ),
    (
        "Kawasaki Ninja ZX6r",
        &[
            (2017, 6120), (2018, 6390), (2019, 6150), (2020, 6675), (2021, 6900),
            (2022, 7230), (2023, 8020), (2024, 8715), (2025, 9080),
        ],
    ),
    (
        "BMW S1000rr",
        &[
            (2017, 11470), (2018, 11810), (2019, 12235), (2020, 12475), (2021, 13325),
            (2022, 14260), (2023, 15190), (2024, 16280), (2025, 16825),
        ],
    ),
    (
        "Suzuki Hayabusa 1300",
        &[
            (2017, 8590), (2018, 8870), (2019, 9300), (2020, 9705), (2021, 10600),
            (2022, 11565), (2023, 13070), (2024, 13720), (2025, 14465),
        ],
    ),
    (
        "Ducati Panigale V4S",
        &[
            (2017, 11000), (2018, 13855), (2019, 14400), (2020, 14780), (2021, 15450),
            (2022, 17905), (2023, 19525), (2024, 20735), (2025, 22820),
        ],
    ),
    (
        "Ducati Panigale V4",
        &[
            (2017, 9175), (2018, 9175), (2019, 10950), (2020, 11450), (2021, 12000),
            (2022, 12375), (2023, 14770), (2024, 15740), (2025, 17170),
        ],
    ),
    (
        "Ducati Panigale V2",
        &[
            (2020, 8585), (2021, 8960), (2022, 10150), (2023, 11425), (2024, 12235),
            (2025, 12480),
        ],
    ),
];

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled sport-bike price table.
    pub fn builtin() -> Self {
        let models = BUILTIN_PRICES
            .iter()
            .map(|(model, years)| (model.to_string(), years.iter().copied().collect()))
            .collect();
        Self { models }
    }

    /// Builds a table from (model, year, price) triples.
    ///
    /// Repeating a pair with the same price is harmless; repeating it with a
    /// different price is rejected, since a pair has exactly one price.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i32, u32)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (model, year, price) in entries {
            let model = model.into();
            let years = table.models.entry(model.clone()).or_default();
            match years.get(&year) {
                Some(existing) if *existing != price => {
                    return Err(ScoutError::ConfigError {
                        message: format!(
                            "conflicting reference prices for {} {}: {} and {}",
                            model, year, existing, price
                        ),
                    });
                }
                _ => {
                    years.insert(year, price);
                }
            }
        }
        Ok(table)
    }

    /// Sets the price for a pair, replacing any previous one.
    pub fn insert(&mut self, model: impl Into<String>, year: i32, price: u32) {
        self.models.entry(model.into()).or_default().insert(year, price);
    }

    pub fn contains_model(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn years(&self, model: &str) -> Option<&BTreeMap<i32, u32>> {
        self.models.get(model)
    }

    pub fn price(&self, model: &str, year: i32) -> Option<u32> {
        self.models.get(model)?.get(&year).copied()
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
