//! Field tags for catalog items.
//!
//! The original data path drives column updates from runtime reflection over
//! struct tags; here the same mapping is a static table. A [`FieldTag`] names
//! one catalog attribute, and `value_of` is the accessor that replaces
//! reflection.

use crate::catalog::CatalogItem;

/// Stable machine-readable tag for one catalog field. The string form of each
/// tag matches both the catalog JSON key and the per-dialect mapping tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldTag {
    Id,
    Classname,
    Name,
    Category,
    Revision,
    Description,
    Adurl,
    Offerid,
    Buyout,
    Rentofferid,
    Rentbuyout,
    Bc,
    Excludeddynamic,
    Customparams,
    Specialtype,
    Furniline,
    Environment,
    Rare,
    Defaultdir,
    Xdim,
    Ydim,
    Canstandon,
    Cansiton,
    Canlayon,
    Partcolors,
}

/// A catalog field value, extracted through a [`FieldTag`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Colors(Vec<String>),
}

impl FieldTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Classname => "classname",
            Self::Name => "name",
            Self::Category => "category",
            Self::Revision => "revision",
            Self::Description => "description",
            Self::Adurl => "adurl",
            Self::Offerid => "offerid",
            Self::Buyout => "buyout",
            Self::Rentofferid => "rentofferid",
            Self::Rentbuyout => "rentbuyout",
            Self::Bc => "bc",
            Self::Excludeddynamic => "excludeddynamic",
            Self::Customparams => "customparams",
            Self::Specialtype => "specialtype",
            Self::Furniline => "furniline",
            Self::Environment => "environment",
            Self::Rare => "rare",
            Self::Defaultdir => "defaultdir",
            Self::Xdim => "xdim",
            Self::Ydim => "ydim",
            Self::Canstandon => "canstandon",
            Self::Cansiton => "cansiton",
            Self::Canlayon => "canlayon",
            Self::Partcolors => "partcolors",
        }
    }

    /// Extract this field's value from a catalog item.
    pub fn value_of(self, item: &CatalogItem) -> FieldValue {
        match self {
            Self::Id => FieldValue::Int(item.id),
            Self::Classname => FieldValue::Text(item.classname.clone()),
            Self::Name => FieldValue::Text(item.name.clone()),
            Self::Category => FieldValue::Text(item.category.clone()),
            Self::Revision => FieldValue::Int(item.revision),
            Self::Description => FieldValue::Text(item.description.clone()),
            Self::Adurl => FieldValue::Text(item.adurl.clone()),
            Self::Offerid => FieldValue::Int(item.offerid),
            Self::Buyout => FieldValue::Bool(item.buyout),
            Self::Rentofferid => FieldValue::Int(item.rentofferid),
            Self::Rentbuyout => FieldValue::Bool(item.rentbuyout),
            Self::Bc => FieldValue::Bool(item.bc),
            Self::Excludeddynamic => FieldValue::Bool(item.excludeddynamic),
            Self::Customparams => FieldValue::Text(item.customparams.clone()),
            Self::Specialtype => FieldValue::Int(item.specialtype),
            Self::Furniline => FieldValue::Text(item.furniline.clone()),
            Self::Environment => FieldValue::Text(item.environment.clone()),
            Self::Rare => FieldValue::Bool(item.rare),
            Self::Defaultdir => FieldValue::Int(item.defaultdir),
            Self::Xdim => FieldValue::Int(item.xdim),
            Self::Ydim => FieldValue::Int(item.ydim),
            Self::Canstandon => FieldValue::Bool(item.canstandon),
            Self::Cansiton => FieldValue::Bool(item.cansiton),
            Self::Canlayon => FieldValue::Bool(item.canlayon),
            Self::Partcolors => FieldValue::Colors(item.partcolors.color.clone()),
        }
    }
}

impl std::fmt::Display for FieldTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
