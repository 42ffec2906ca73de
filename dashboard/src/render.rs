//! Plain-text rendition of the two screens.
//!
//! Optional fields that are absent are left out entirely rather than shown
//! as blanks.

use std::fmt;

use petboard_core::view_model::type_options;
use petboard_core::{Animal, Dashboard, Route, ViewState};

const BAR_WIDTH: usize = 30;

fn bar(value: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (value * BAR_WIDTH).div_ceil(max);
    "█".repeat(len)
}

/// Renders the list route in whatever state it is in.
pub struct DashboardScreen<'a>(pub &'a ViewState<Dashboard>);

impl fmt::Display for DashboardScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = match self.0 {
            ViewState::Loading => return writeln!(f, "Loading pets..."),
            ViewState::Error(error) => return writeln!(f, "Error: {error}"),
            ViewState::Ready(dashboard) => dashboard,
        };
        let stats = dashboard.statistics();

        let average = stats
            .average_bracket()
            .map_or_else(|| "-".to_string(), |bracket| bracket.to_string());
        writeln!(f, "Total Pets: {}", stats.total)?;
        writeln!(f, "Average Age Group: {average}")?;
        writeln!(f, "Pet Types: {}", stats.type_count())?;

        writeln!(f)?;
        writeln!(f, "Pet Types Distribution")?;
        for share in stats.type_shares() {
            writeln!(f, "  {:<20} {}", share.label(), bar(share.count, stats.total))?;
        }

        writeln!(f)?;
        writeln!(f, "Age Distribution")?;
        let tallest = stats.age_distribution().iter().map(|(_, count)| *count).max().unwrap_or(0);
        for (age, count) in stats.age_distribution() {
            writeln!(f, "  {:<8} {:>3} {}", age.label(), count, bar(*count, tallest))?;
        }

        writeln!(f)?;
        let filter = dashboard.filter();
        let selected = type_options(stats)
            .into_iter()
            .find(|option| option.value == filter.type_filter)
            .map_or_else(|| filter.type_filter.to_string(), |option| option.label);
        writeln!(f, "Search: \"{}\"  Type: {selected}", filter.search)?;

        for animal in dashboard.filtered() {
            writeln!(f)?;
            write_row(f, animal)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, animal: &Animal) -> fmt::Result {
    let link = Route::PetDetail { id: animal.id };
    writeln!(f, "{}  [{link}]", animal.name)?;
    if let Some(breed) = &animal.breeds.primary {
        writeln!(f, "  {breed}")?;
    }
    if let Some(description) = &animal.description {
        writeln!(f, "  {description}")?;
    }
    writeln!(f, "  {} | {} | {}", animal.kind, animal.age_label(), animal.gender)?;
    if let Some(photo) = animal.thumbnail() {
        writeln!(f, "  {photo}")?;
    }
    Ok(())
}

/// Renders the detail route in whatever state it is in.
pub struct DetailScreen<'a>(pub &'a ViewState<Animal>);

impl fmt::Display for DetailScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pet = match self.0 {
            ViewState::Loading => return writeln!(f, "Loading pet details..."),
            ViewState::Error(error) => return writeln!(f, "Error: {error}"),
            ViewState::Ready(pet) => pet,
        };

        match &pet.status {
            Some(status) => writeln!(f, "{} ({status})", pet.name)?,
            None => writeln!(f, "{}", pet.name)?,
        }
        for photo in pet.photos.iter().filter_map(|photo| photo.large.as_deref()) {
            writeln!(f, "  {photo}")?;
        }

        writeln!(f)?;
        writeln!(f, "About")?;
        if let Some(description) = &pet.description {
            writeln!(f, "  {description}")?;
        }

        writeln!(f)?;
        writeln!(f, "Breed")?;
        if let Some(primary) = &pet.breeds.primary {
            writeln!(f, "  {primary}")?;
        }
        if let Some(secondary) = &pet.breeds.secondary {
            writeln!(f, "  Mixed with {secondary}")?;
        }

        writeln!(f, "Colors")?;
        if let Some(primary) = &pet.colors.primary {
            writeln!(f, "  {primary}")?;
        }
        if let Some(secondary) = &pet.colors.secondary {
            writeln!(f, "  {secondary}")?;
        }

        writeln!(f, "Age")?;
        writeln!(f, "  {}", pet.age_label())?;
        writeln!(f, "Size")?;
        writeln!(f, "  {}", pet.size)?;

        writeln!(f)?;
        writeln!(f, "Characteristics")?;
        for tag in &pet.tags {
            writeln!(f, "  - {tag}")?;
        }

        writeln!(f)?;
        writeln!(f, "Contact")?;
        if let Some(email) = &pet.contact.email {
            writeln!(f, "  Email: {email}")?;
        }
        if let Some(phone) = &pet.contact.phone {
            writeln!(f, "  Phone: {phone}")?;
        }
        let address = &pet.contact.address;
        writeln!(
            f,
            "  Location: {}, {}",
            address.city.as_deref().unwrap_or_default(),
            address.state.as_deref().unwrap_or_default()
        )
    }
}
