//! Dialect profiles for the supported emulator schemas.
//!
//! Each profile is static data: the target table, the catalog-tag to column
//! mappings with SQL types and defaults, and how the schema spells its
//! boolean flag columns. The three dialects differ in table name, column
//! names, and column types; everything downstream is driven from these tables.

use crate::error::DbError;
use armoire_core::FieldTag;

/// A supported emulator schema variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Arcturus,
    Comet,
    Plus,
}

impl Dialect {
    /// Parse a dialect tag. Any value other than the three literal tags is
    /// rejected.
    pub fn parse(tag: &str) -> Result<Self, DbError> {
        match tag.to_ascii_lowercase().as_str() {
            "arcturus" => Ok(Self::Arcturus),
            "comet" => Ok(Self::Comet),
            "plus" => Ok(Self::Plus),
            other => Err(DbError::UnsupportedDialect(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arcturus => "arcturus",
            Self::Comet => "comet",
            Self::Plus => "plus",
        }
    }

    /// The static profile for this dialect.
    pub fn profile(self) -> &'static DialectProfile {
        match self {
            Self::Arcturus => &ARCTURUS,
            Self::Comet => &COMET,
            Self::Plus => &PLUS,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a boolean flag is stored in a given column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolEncoding {
    /// `TINYINT(1)` / `INT`: 0 or 1 as an integer.
    Tinyint,
    /// `ENUM('0','1')`: the character '0' or '1'.
    EnumChar,
}

/// One catalog-tag to database-column mapping.
#[derive(Clone, Copy, Debug)]
pub struct ParameterMapping {
    /// Catalog field supplying the value.
    pub tag: FieldTag,
    /// Target column name.
    pub column: &'static str,
    /// SQL column type, used verbatim in `ALTER TABLE ADD COLUMN`.
    pub sql_type: &'static str,
    /// Default clause value, or `None` for nullable columns without one.
    pub default: Option<&'static str>,
    /// Whether schema evolution is expected to add this column.
    pub is_new_column: bool,
}

impl ParameterMapping {
    /// How boolean values bind against this column.
    pub fn bool_encoding(&self) -> BoolEncoding {
        if self.sql_type.starts_with("ENUM") {
            BoolEncoding::EnumChar
        } else {
            BoolEncoding::Tinyint
        }
    }
}

/// The flag columns backing the normalized `can_sit`/`can_walk`/`can_lay`
/// projection.
#[derive(Clone, Copy, Debug)]
pub struct FlagColumns {
    pub can_sit: &'static str,
    pub can_walk: &'static str,
    pub can_lay: &'static str,
    pub encoding: BoolEncoding,
}

/// Static description of one emulator schema.
#[derive(Debug)]
pub struct DialectProfile {
    pub dialect: Dialect,
    /// Furniture definition table.
    pub table: &'static str,
    /// Full catalog-tag to column mapping table.
    pub mappings: &'static [ParameterMapping],
    /// Boolean flag columns for the normalized row projection.
    pub flags: FlagColumns,
}

impl DialectProfile {
    /// Look up the mapping for a catalog tag.
    pub fn mapping_for(&self, tag: FieldTag) -> Option<&ParameterMapping> {
        self.mappings.iter().find(|m| m.tag == tag)
    }

    /// The column the catalog `id` joins against (`sprite_id` everywhere).
    pub fn sprite_id_column(&self) -> &'static str {
        "sprite_id"
    }

    /// The classname column (`item_name` everywhere).
    pub fn item_name_column(&self) -> &'static str {
        "item_name"
    }

    /// The display name column (`public_name` everywhere).
    pub fn public_name_column(&self) -> &'static str {
        "public_name"
    }
}

static ARCTURUS: DialectProfile = DialectProfile {
    dialect: Dialect::Arcturus,
    table: "items_base",
    flags: FlagColumns {
        can_sit: "allow_sit",
        can_walk: "allow_walk",
        can_lay: "allow_lay",
        encoding: BoolEncoding::Tinyint,
    },
    mappings: &[
        ParameterMapping { tag: FieldTag::Id, column: "sprite_id", sql_type: "INT", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Classname, column: "item_name", sql_type: "VARCHAR(70)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Name, column: "public_name", sql_type: "VARCHAR(56)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Xdim, column: "width", sql_type: "INT", default: Some("1"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Ydim, column: "length", sql_type: "INT", default: Some("1"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Cansiton, column: "allow_sit", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Canlayon, column: "allow_lay", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Canstandon, column: "allow_walk", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Customparams, column: "customparams", sql_type: "VARCHAR(25600)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Description, column: "description", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Revision, column: "revision", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Category, column: "category", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Offerid, column: "offerid", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Buyout, column: "buyout", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rentofferid, column: "rentofferid", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rentbuyout, column: "rentbuyout", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Bc, column: "bc", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Excludeddynamic, column: "excludeddynamic", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Furniline, column: "furniline", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Environment, column: "environment", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Adurl, column: "adurl", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Defaultdir, column: "defaultdir", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Partcolors, column: "partcolors", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Specialtype, column: "furni_specialtype", sql_type: "INT", default: Some("0"), is_new_column: true },
    ],
};

static COMET: DialectProfile = DialectProfile {
    dialect: Dialect::Comet,
    table: "furniture",
    flags: FlagColumns {
        can_sit: "can_sit",
        can_walk: "is_walkable",
        can_lay: "can_lay",
        encoding: BoolEncoding::EnumChar,
    },
    mappings: &[
        ParameterMapping { tag: FieldTag::Id, column: "sprite_id", sql_type: "INT", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Classname, column: "item_name", sql_type: "VARCHAR(255)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Name, column: "public_name", sql_type: "VARCHAR(255)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Xdim, column: "width", sql_type: "INT", default: Some("1"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Ydim, column: "length", sql_type: "INT", default: Some("1"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Cansiton, column: "can_sit", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Canlayon, column: "can_lay", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Canstandon, column: "is_walkable", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Revision, column: "revision", sql_type: "INT", default: Some("45554"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Description, column: "description", sql_type: "VARCHAR(255)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Partcolors, column: "colors", sql_type: "LONGTEXT", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Category, column: "category", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Offerid, column: "offerid", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Buyout, column: "buyout", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rentofferid, column: "rentofferid", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rentbuyout, column: "rentbuyout", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Bc, column: "bc", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Excludeddynamic, column: "excludeddynamic", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Furniline, column: "furniline", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Environment, column: "environment", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Adurl, column: "adurl", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Defaultdir, column: "defaultdir", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Customparams, column: "customparams", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Specialtype, column: "furni_specialtype", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rare, column: "is_rare", sql_type: "ENUM('0','1')", default: Some("'0'"), is_new_column: true },
    ],
};

static PLUS: DialectProfile = DialectProfile {
    dialect: Dialect::Plus,
    table: "furniture",
    flags: FlagColumns {
        can_sit: "can_sit",
        can_walk: "is_walkable",
        can_lay: "can_lay",
        encoding: BoolEncoding::Tinyint,
    },
    mappings: &[
        ParameterMapping { tag: FieldTag::Id, column: "sprite_id", sql_type: "INT", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Classname, column: "item_name", sql_type: "VARCHAR(255)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Name, column: "public_name", sql_type: "VARCHAR(255)", default: None, is_new_column: false },
        ParameterMapping { tag: FieldTag::Xdim, column: "width", sql_type: "INT", default: Some("1"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Ydim, column: "length", sql_type: "INT", default: Some("1"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Cansiton, column: "can_sit", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Canstandon, column: "is_walkable", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Rare, column: "is_rare", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: false },
        ParameterMapping { tag: FieldTag::Description, column: "description", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Revision, column: "revision", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Category, column: "category", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Offerid, column: "offerid", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Buyout, column: "buyout", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rentofferid, column: "rentofferid", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Rentbuyout, column: "rentbuyout", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Bc, column: "bc", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Excludeddynamic, column: "excludeddynamic", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Furniline, column: "furniline", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Environment, column: "environment", sql_type: "VARCHAR(100)", default: Some("''"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Adurl, column: "adurl", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Defaultdir, column: "defaultdir", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Partcolors, column: "partcolors", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Customparams, column: "customparams", sql_type: "TEXT", default: None, is_new_column: true },
        ParameterMapping { tag: FieldTag::Specialtype, column: "furni_specialtype", sql_type: "INT", default: Some("0"), is_new_column: true },
        ParameterMapping { tag: FieldTag::Canlayon, column: "can_lay", sql_type: "TINYINT(1)", default: Some("0"), is_new_column: true },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_three_tags() {
        assert_eq!(Dialect::parse("arcturus").unwrap(), Dialect::Arcturus);
        assert_eq!(Dialect::parse("Comet").unwrap(), Dialect::Comet);
        assert_eq!(Dialect::parse("PLUS").unwrap(), Dialect::Plus);
    }

    #[test]
    fn parse_rejects_unknown_tags() {
        match Dialect::parse("habbo") {
            Err(DbError::UnsupportedDialect(tag)) => assert_eq!(tag, "habbo"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn table_names_differ_per_dialect() {
        assert_eq!(Dialect::Arcturus.profile().table, "items_base");
        assert_eq!(Dialect::Comet.profile().table, "furniture");
        assert_eq!(Dialect::Plus.profile().table, "furniture");
    }

    #[test]
    fn every_profile_maps_the_join_keys() {
        for dialect in [Dialect::Arcturus, Dialect::Comet, Dialect::Plus] {
            let profile = dialect.profile();
            assert_eq!(
                profile.mapping_for(FieldTag::Id).unwrap().column,
                "sprite_id"
            );
            assert_eq!(
                profile.mapping_for(FieldTag::Classname).unwrap().column,
                "item_name"
            );
            assert_eq!(
                profile.mapping_for(FieldTag::Name).unwrap().column,
                "public_name"
            );
            assert!(!profile.mapping_for(FieldTag::Id).unwrap().is_new_column);
        }
    }

    #[test]
    fn bool_encoding_follows_column_type() {
        let comet = Dialect::Comet.profile();
        assert_eq!(
            comet.mapping_for(FieldTag::Cansiton).unwrap().bool_encoding(),
            BoolEncoding::EnumChar
        );

        let arcturus = Dialect::Arcturus.profile();
        assert_eq!(
            arcturus
                .mapping_for(FieldTag::Cansiton)
                .unwrap()
                .bool_encoding(),
            BoolEncoding::Tinyint
        );
    }

    #[test]
    fn flag_columns_differ_per_dialect() {
        assert_eq!(Dialect::Arcturus.profile().flags.can_sit, "allow_sit");
        assert_eq!(Dialect::Comet.profile().flags.can_walk, "is_walkable");
        assert_eq!(Dialect::Plus.profile().flags.encoding, BoolEncoding::Tinyint);
        assert_eq!(
            Dialect::Comet.profile().flags.encoding,
            BoolEncoding::EnumChar
        );
    }

    #[test]
    fn plus_adds_can_lay_by_evolution() {
        let mapping = Dialect::Plus
            .profile()
            .mapping_for(FieldTag::Canlayon)
            .unwrap();
        assert!(mapping.is_new_column);
        assert_eq!(mapping.column, "can_lay");
    }

    #[test]
    fn comet_stores_partcolors_in_colors_column() {
        let mapping = Dialect::Comet
            .profile()
            .mapping_for(FieldTag::Partcolors)
            .unwrap();
        assert_eq!(mapping.column, "colors");
        assert!(!mapping.is_new_column);
    }
}
