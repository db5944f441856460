//! Fighter catalog
//!
//! Read-only roster loaded once at startup. The fight core only ever looks
//! fighters up by number.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{CatalogError, FightError};

/// Unique fighter number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FighterId(pub u32);

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// A fighter as presented to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterDescriptor {
    pub id: FighterId,
    pub name: String,
    pub description: String,
    pub color: Color,
}

impl FighterDescriptor {
    /// HUD name tag, e.g. `ARNOLD_025`
    pub fn tag(&self) -> String {
        format!("{}_{}", self.name.to_uppercase(), self.id)
    }
}

/// The fighter roster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    fighters: Vec<FighterDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(fighters: Vec<FighterDescriptor>) -> Result<Self, CatalogError> {
        for (i, fighter) in fighters.iter().enumerate() {
            if fighters[..i].iter().any(|f| f.id == fighter.id) {
                return Err(CatalogError::Duplicate(fighter.id));
            }
        }
        Ok(Self { fighters })
    }

    /// Roster shipped with the game
    pub fn builtin() -> Self {
        Self {
            fighters: vec![
                FighterDescriptor {
                    id: FighterId(25),
                    name: "Arnold".to_string(),
                    description: "Reads every punch before it is thrown and answers with \
                                  concentrated neural fire"
                        .to_string(),
                    color: Color::rgb(0xFF, 0x31, 0x31),
                },
                FighterDescriptor {
                    id: FighterId(11),
                    name: "Frank".to_string(),
                    description: "All action and no overfitting, trained on a wild linear \
                                  exploration schedule"
                        .to_string(),
                    color: Color::rgb(0x31, 0x54, 0xFF),
                },
            ],
        }
    }

    /// Parse a roster from a JSON array of fighters
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let fighters: Vec<FighterDescriptor> = serde_json::from_str(json)?;
        let catalog = Self::new(fighters)?;
        log::info!("Loaded {} fighters", catalog.fighters.len());
        Ok(catalog)
    }

    pub fn lookup(&self, id: FighterId) -> Option<&FighterDescriptor> {
        self.fighters.iter().find(|f| f.id == id)
    }

    /// Lookup that fails with `UnknownFighter`
    pub fn get(&self, id: FighterId) -> Result<&FighterDescriptor, FightError> {
        self.lookup(id).ok_or(FightError::UnknownFighter(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FighterDescriptor> {
        self.fighters.iter()
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        let arnold = catalog.lookup(FighterId(25)).unwrap();
        assert_eq!(arnold.name, "Arnold");
        assert_eq!(arnold.color.to_hex(), "#FF3131");
        assert!(catalog.lookup(FighterId(7)).is_none());
        assert!(matches!(
            catalog.get(FighterId(7)),
            Err(FightError::UnknownFighter(FighterId(7)))
        ));
    }

    #[test]
    fn test_tag_pads_number() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get(FighterId(11)).unwrap().tag(), "FRANK_011");
        assert_eq!(catalog.get(FighterId(25)).unwrap().tag(), "ARNOLD_025");
    }

    #[test]
    fn test_from_json() {
        let json = r##"[
            {"id": 3, "name": "Ivy", "description": "quick", "color": "#00AA00"},
            {"id": 4, "name": "Moe", "description": "slow", "color": "#AA00AA"}
        ]"##;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(FighterId(4)).unwrap().color, Color::rgb(0xAA, 0, 0xAA));
    }

    #[test]
    fn test_from_json_rejects_duplicates_and_bad_colors() {
        let dup = r##"[
            {"id": 3, "name": "Ivy", "description": "", "color": "#00AA00"},
            {"id": 3, "name": "Moe", "description": "", "color": "#AA00AA"}
        ]"##;
        assert!(matches!(
            Catalog::from_json(dup),
            Err(CatalogError::Duplicate(FighterId(3)))
        ));

        let bad = r#"[{"id": 1, "name": "X", "description": "", "color": "red"}]"#;
        assert!(matches!(Catalog::from_json(bad), Err(CatalogError::Json(_))));
    }
}
