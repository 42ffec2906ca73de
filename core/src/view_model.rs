//! Pure derivation from the fetched animal list to what the dashboard shows.
//!
//! Filtering narrows the visible list; the summary cards and both charts are
//! always computed over the full, unfiltered list.

use std::fmt;

use crate::types::{AgeBracket, Animal};

/// Type selector value: every type, or one concrete type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    /// `"all"` in any case selects every type; anything else selects that type.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            TypeFilter::All
        } else {
            TypeFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted.to_lowercase() == kind.to_lowercase(),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(kind) => f.write_str(kind),
        }
    }
}

/// User-controlled filter inputs. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub type_filter: TypeFilter,
}

impl FilterState {
    pub fn includes(&self, animal: &Animal) -> bool {
        self.type_filter.matches(&animal.kind) && self.matches_search(animal)
    }

    fn matches_search(&self, animal: &Animal) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        contains(Some(animal.name.as_str()))
            || contains(animal.description.as_deref())
            || contains(animal.breeds.primary.as_deref())
    }
}

/// Animals satisfying `filter`, in their original order.
pub fn filter_animals<'a>(animals: &'a [Animal], filter: &FilterState) -> Vec<&'a Animal> {
    animals.iter().filter(|animal| filter.includes(animal)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub name: String,
    pub count: usize,
}

/// One slice of the type pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShare {
    pub name: String,
    pub count: usize,
    pub percent: f64,
}

impl TypeShare {
    /// `"{name} {percent}%"` with exact halves rounded up.
    pub fn label(&self) -> String {
        let rounded = (self.percent + 0.5).floor() as u64;
        format!("{} {rounded}%", self.name)
    }
}

/// Summary over the whole data set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub total: usize,
    /// Mean of the bracket weights; `None` when there are no animals.
    pub average_age: Option<f64>,
    /// Per-type counts in first-appearance order. Types compare exactly.
    pub type_counts: Vec<TypeCount>,
    /// Per-bracket counts in first-appearance order. Unknown ages are left out.
    pub age_counts: Vec<(AgeBracket, usize)>,
}

impl Statistics {
    pub fn compute(animals: &[Animal]) -> Self {
        let total = animals.len();
        let average_age = (total > 0).then(|| {
            // Unknown ages weigh zero but still count toward the total.
            let sum: u32 = animals
                .iter()
                .map(|animal| animal.age.map_or(0, AgeBracket::value))
                .sum();
            f64::from(sum) / total as f64
        });

        let mut type_counts: Vec<TypeCount> = Vec::new();
        let mut age_counts: Vec<(AgeBracket, usize)> = Vec::new();
        for animal in animals {
            match type_counts.iter_mut().find(|entry| entry.name == animal.kind) {
                Some(entry) => entry.count += 1,
                None => type_counts.push(TypeCount {
                    name: animal.kind.clone(),
                    count: 1,
                }),
            }
            let Some(age) = animal.age else {
                continue;
            };
            match age_counts.iter_mut().find(|(known, _)| *known == age) {
                Some((_, count)) => *count += 1,
                None => age_counts.push((age, 1)),
            }
        }

        Self {
            total,
            average_age,
            type_counts,
            age_counts,
        }
    }

    /// Average rounded to the nearest bracket, exact halves rounding up.
    pub fn average_bracket(&self) -> Option<AgeBracket> {
        let average = self.average_age?;
        let index = (average - 0.5).floor();
        if index < 0.0 {
            return None;
        }
        AgeBracket::from_index(index as usize)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.type_counts.iter().map(|entry| entry.name.as_str())
    }

    pub fn type_count(&self) -> usize {
        self.type_counts.len()
    }

    pub fn type_shares(&self) -> Vec<TypeShare> {
        self.type_counts
            .iter()
            .map(|entry| TypeShare {
                name: entry.name.clone(),
                count: entry.count,
                percent: entry.count as f64 * 100.0 / self.total as f64,
            })
            .collect()
    }

    pub fn age_distribution(&self) -> &[(AgeBracket, usize)] {
        &self.age_counts
    }
}

/// Entry in the type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOption {
    pub value: TypeFilter,
    pub label: String,
}

/// "All Types" followed by one option per type with its count.
pub fn type_options(stats: &Statistics) -> Vec<TypeOption> {
    let mut options = vec![TypeOption {
        value: TypeFilter::All,
        label: "All Types".to_string(),
    }];
    options.extend(stats.type_counts.iter().map(|entry| TypeOption {
        value: TypeFilter::Only(entry.name.clone()),
        label: format!("{} ({})", entry.name, entry.count),
    }));
    options
}

/// Loaded dashboard: the fetched list, the filter, and what derives from them.
#[derive(Debug, Clone)]
pub struct Dashboard {
    animals: Vec<Animal>,
    filter: FilterState,
    statistics: Statistics,
    visible: Vec<usize>,
}

impl Dashboard {
    pub fn new(animals: Vec<Animal>) -> Self {
        let statistics = Statistics::compute(&animals);
        let visible = (0..animals.len()).collect();
        Self {
            animals,
            filter: FilterState::default(),
            statistics,
            visible,
        }
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.refilter();
    }

    pub fn set_type_filter(&mut self, type_filter: TypeFilter) {
        self.filter.type_filter = type_filter;
        self.refilter();
    }

    /// Animals passing the current filter, in server order.
    pub fn filtered(&self) -> impl Iterator<Item = &Animal> {
        self.visible.iter().map(|&index| &self.animals[index])
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    fn refilter(&mut self) {
        self.visible = self
            .animals
            .iter()
            .enumerate()
            .filter(|(_, animal)| self.filter.includes(animal))
            .map(|(index, _)| index)
            .collect();
    }
}
