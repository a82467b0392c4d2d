//! Report state: the values a user fills in before exporting.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use uuid::Uuid;

use crate::{photo::PhotoLibrary, sketch::SketchSnapshot};

/// Equipment brands a report may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Brand {
    Aux,
    Bosh,
    Dekert,
    Hisense,
    MideaGroup,
    MvPower,
    Samsung,
    Toshiba,
    Vivax,
}

impl Brand {
    /// Every brand in display order.
    pub const ALL: [Brand; 9] = [
        Brand::Aux,
        Brand::Bosh,
        Brand::Dekert,
        Brand::Hisense,
        Brand::MideaGroup,
        Brand::MvPower,
        Brand::Samsung,
        Brand::Toshiba,
        Brand::Vivax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aux => "Aux",
            Self::Bosh => "Bosh",
            Self::Dekert => "Dekert",
            Self::Hisense => "Hisense",
            Self::MideaGroup => "MideaGroup",
            Self::MvPower => "MvPower",
            Self::Samsung => "Samsung",
            Self::Toshiba => "Toshiba",
            Self::Vivax => "Vivax",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Brand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|brand| brand.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|brand| brand.as_str()).collect();
                format!("unknown brand `{s}`, valid values: {}", valid.join(", "))
            })
    }
}

/// One row of the brand list: an identifier and an optional choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandSelection {
    id: Uuid,
    brand: Option<Brand>,
}

impl BrandSelection {
    fn new(brand: Option<Brand>) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn brand(&self) -> Option<Brand> {
        self.brand
    }
}

/// Ordered brand rows as shown in the form.
///
/// A fresh list holds a single empty row, matching what the form shows
/// before the user picks anything.
///
/// # Examples
///
/// ```
/// # use inspekt::report::{Brand, BrandList};
/// let mut brands = BrandList::new();
/// let first = brands.iter().next().unwrap().id();
/// brands.set(first, Some(Brand::Samsung));
/// brands.add();
///
/// assert_eq!(brands.lines("-"), vec!["1. Samsung", "2. -"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandList {
    selections: Vec<BrandSelection>,
}

impl Default for BrandList {
    fn default() -> Self {
        Self::new()
    }
}

impl BrandList {
    pub fn new() -> Self {
        Self {
            selections: vec![BrandSelection::new(None)],
        }
    }

    /// A list without any row.
    pub fn empty() -> Self {
        Self {
            selections: Vec::new(),
        }
    }

    /// Builds a list with one row per entry.
    pub fn from_brands(brands: impl IntoIterator<Item = Option<Brand>>) -> Self {
        Self {
            selections: brands.into_iter().map(BrandSelection::new).collect(),
        }
    }

    /// Appends an empty row and returns its identifier.
    pub fn add(&mut self) -> Uuid {
        let selection = BrandSelection::new(None);
        let id = selection.id();
        self.selections.push(selection);
        id
    }

    /// Sets the brand of a row. Returns `false` for unknown identifiers.
    pub fn set(&mut self, id: Uuid, brand: Option<Brand>) -> bool {
        match self.selections.iter_mut().find(|s| s.id == id) {
            Some(selection) => {
                selection.brand = brand;
                true
            }
            None => false,
        }
    }

    /// Removes a row. Returns `false` for unknown identifiers.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.id != id);
        before != self.selections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrandSelection> {
        self.selections.iter()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Numbered display lines (`"1. Samsung"`), using `placeholder` for
    /// rows without a choice.
    pub fn lines(&self, placeholder: &str) -> Vec<String> {
        self.selections
            .iter()
            .enumerate()
            .map(|(i, selection)| match selection.brand {
                Some(brand) => format!("{}. {brand}", i + 1),
                None => format!("{}. {placeholder}", i + 1),
            })
            .collect()
    }
}

/// Committed sketches in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SketchList {
    sketches: Vec<SketchSnapshot>,
}

impl SketchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sketch: SketchSnapshot) {
        self.sketches.push(sketch);
    }

    /// Removes the sketch at `index`, shifting later sketches down.
    pub fn remove(&mut self, index: usize) -> Option<SketchSnapshot> {
        (index < self.sketches.len()).then(|| self.sketches.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&SketchSnapshot> {
        self.sketches.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SketchSnapshot> {
        self.sketches.iter()
    }

    pub fn len(&self) -> usize {
        self.sketches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty()
    }
}

/// Everything that goes into an inspection report.
#[derive(Debug, Clone, Default)]
pub struct Report {
    client_name: String,
    notes: String,
    brands: BrandList,
    max_price: String,
    sketches: SketchList,
    photos: PhotoLibrary,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn brands(&self) -> &BrandList {
        &self.brands
    }

    /// The price ceiling as typed, without currency.
    pub fn max_price(&self) -> &str {
        &self.max_price
    }

    pub fn sketches(&self) -> &SketchList {
        &self.sketches
    }

    pub fn photos(&self) -> &PhotoLibrary {
        &self.photos
    }

    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.client_name = name.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_max_price(&mut self, price: impl Into<String>) {
        self.max_price = price.into();
    }

    pub fn brands_mut(&mut self) -> &mut BrandList {
        &mut self.brands
    }

    pub fn sketches_mut(&mut self) -> &mut SketchList {
        &mut self.sketches
    }

    pub fn photos_mut(&mut self) -> &mut PhotoLibrary {
        &mut self.photos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_from_str() {
        assert_eq!(Brand::from_str("Samsung").unwrap(), Brand::Samsung);
        assert_eq!(Brand::from_str("MideaGroup").unwrap(), Brand::MideaGroup);
        assert!(Brand::from_str("samsung").is_err());

        let err = Brand::from_str("Daikin").unwrap_err();
        assert!(err.contains("unknown brand `Daikin`"));
        assert!(err.contains("Vivax"));
    }

    #[test]
    fn test_brand_all_round_trips_names() {
        for brand in Brand::ALL {
            assert_eq!(Brand::from_str(&brand.to_string()).unwrap(), brand);
        }
    }

    #[test]
    fn test_brand_list_starts_with_empty_row() {
        let brands = BrandList::new();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands.iter().next().unwrap().brand(), None);
        assert_eq!(brands.lines("-"), vec!["1. -"]);
    }

    #[test]
    fn test_brand_list_edit() {
        let mut brands = BrandList::new();
        let second = brands.add();
        let third = brands.add();
        assert!(brands.set(third, Some(Brand::Toshiba)));
        assert!(brands.remove(second));
        assert!(!brands.remove(second));
        assert!(!brands.set(second, Some(Brand::Aux)));

        // Numbering follows the current order
        assert_eq!(brands.lines("-"), vec!["1. -", "2. Toshiba"]);
    }

    #[test]
    fn test_brand_ids_are_unique() {
        let mut brands = BrandList::empty();
        let a = brands.add();
        let b = brands.add();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sketch_list_remove_out_of_range() {
        let mut sketches = SketchList::new();
        assert!(sketches.remove(0).is_none());
        assert!(sketches.is_empty());
    }
}
