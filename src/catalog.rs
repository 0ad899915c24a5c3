//! Skill and demon reference data.
//!
//! Content is plain JSON. Registries reject duplicate ids, and a `Catalog`
//! additionally checks that every demon only references skills it can resolve,
//! so content bugs surface at load time instead of as silent no-ops mid-battle.

use crate::combat::types::{DemonDef, SkillDef, Stats};
use crate::error::ConfigError;
use std::collections::HashMap;

const BUILTIN_SKILLS: &str = include_str!("../data/skills.json");
const BUILTIN_DEMONS: &str = include_str!("../data/demons.json");

/// Skills keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, SkillDef>,
}

impl SkillRegistry {
    pub fn from_skills(skills: Vec<SkillDef>) -> Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(skills.len());
        for skill in skills {
            if map.contains_key(&skill.id) {
                return Err(ConfigError::DuplicateSkill(skill.id));
            }
            map.insert(skill.id.clone(), skill);
        }
        Ok(Self { skills: map })
    }

    /// Parse a JSON array of skills.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let skills: Vec<SkillDef> = serde_json::from_str(json)?;
        Self::from_skills(skills)
    }

    pub fn get(&self, id: &str) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Demons keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DemonRegistry {
    demons: HashMap<String, DemonDef>,
}

impl DemonRegistry {
    pub fn from_demons(demons: Vec<DemonDef>) -> Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(demons.len());
        for demon in demons {
            if map.contains_key(&demon.id) {
                return Err(ConfigError::DuplicateDemon(demon.id));
            }
            map.insert(demon.id.clone(), demon);
        }
        Ok(Self { demons: map })
    }

    /// Parse a JSON array of demons.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let demons: Vec<DemonDef> = serde_json::from_str(json)?;
        Self::from_demons(demons)
    }

    pub fn get(&self, id: &str) -> Option<&DemonDef> {
        self.demons.get(id)
    }

    /// Demon ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.demons.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.demons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demons.is_empty()
    }
}

/// Validated skills and demons for a game.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub skills: SkillRegistry,
    pub demons: DemonRegistry,
}

impl Catalog {
    /// Bundle registries after checking every demon against the skills.
    pub fn new(skills: SkillRegistry, demons: DemonRegistry) -> Result<Self, ConfigError> {
        for id in demons.ids() {
            if let Some(demon) = demons.get(id) {
                validate_demon(demon, &skills)?;
            }
        }
        Ok(Self { skills, demons })
    }

    pub fn from_json(skills_json: &str, demons_json: &str) -> Result<Self, ConfigError> {
        Self::new(
            SkillRegistry::from_json(skills_json)?,
            DemonRegistry::from_json(demons_json)?,
        )
    }

    /// Content shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_SKILLS, BUILTIN_DEMONS)
    }
}

/// Reject stats the engine cannot make sense of.
pub fn validate_stats(owner: &str, stats: &Stats) -> Result<(), ConfigError> {
    if stats.max_hp == 0 {
        return Err(ConfigError::invalid_stat(owner, "max_hp must be positive"));
    }
    if stats.hp > stats.max_hp {
        return Err(ConfigError::invalid_stat(owner, "hp exceeds max_hp"));
    }
    if !(0.0..=1.0).contains(&stats.crit_chance) {
        return Err(ConfigError::invalid_stat(
            owner,
            "crit_chance must be within 0..=1",
        ));
    }
    if stats.crit_mult.is_some_and(|m| !m.is_finite() || m < 0.0) {
        return Err(ConfigError::invalid_stat(
            owner,
            "crit_mult must be non-negative",
        ));
    }
    Ok(())
}

fn validate_demon(demon: &DemonDef, skills: &SkillRegistry) -> Result<(), ConfigError> {
    if demon.moves.is_empty() {
        return Err(ConfigError::EmptyMoveSet(demon.id.clone()));
    }
    if let Some(missing) = demon.all_move_ids().find(|id| !skills.contains(id)) {
        return Err(ConfigError::UnknownSkill {
            demon: demon.id.clone(),
            skill: missing.clone(),
        });
    }
    if let Some((element, _)) = demon
        .affinities
        .iter()
        .find(|(_, mul)| !mul.is_finite() || **mul < 0.0)
    {
        return Err(ConfigError::invalid_stat(
            &demon.id,
            format!("affinity for {element:?} must be non-negative"),
        ));
    }
    validate_stats(&demon.id, &demon.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::{AiProfile, EffectKey, Element};

    const SKILLS: &str = r#"[
        {"id": "claw", "name": "Claw", "tags": ["single"]},
        {"id": "shell", "name": "Shell", "tags": ["buff"], "effect_key": "guard"}
    ]"#;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.skills.len() >= 8);
        assert_eq!(catalog.demons.len(), 4);

        let wyrm = catalog.demons.get("mortgage_wyrm").unwrap();
        assert_eq!(wyrm.ai, AiProfile::Aggressive);
        assert_eq!(wyrm.stats.element, Element::Shadow);
        assert_eq!(wyrm.affinities.get(&Element::Radiant), Some(&1.5));
        assert_eq!(wyrm.phases.len(), 1);

        let freeze = catalog.skills.get("spending_freeze").unwrap();
        assert_eq!(freeze.effect_key, EffectKey::ElementIceDot);
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let json = r#"[{"id": "claw", "name": "A"}, {"id": "claw", "name": "B"}]"#;
        let err = SkillRegistry::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateSkill(id) if id == "claw"
        ));
    }

    #[test]
    fn test_unknown_demon_skill_rejected() {
        let demons = r#"[{
            "id": "imp", "name": "Imp", "level": 1,
            "hp": 10, "max_hp": 10, "atk": 3, "def": 1, "spd": 2,
            "moves": ["claw", "bite"]
        }]"#;
        let err = Catalog::from_json(SKILLS, demons).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownSkill { ref demon, ref skill } if demon == "imp" && skill == "bite"
        ));
    }

    #[test]
    fn test_unknown_phase_skill_rejected() {
        let demons = r#"[{
            "id": "imp", "name": "Imp", "level": 1,
            "hp": 10, "max_hp": 10, "atk": 3, "def": 1, "spd": 2,
            "moves": ["claw"],
            "phases": [{"below_hp_ratio": 0.5, "add_moves": ["rage"]}]
        }]"#;
        assert!(matches!(
            Catalog::from_json(SKILLS, demons),
            Err(ConfigError::UnknownSkill { .. })
        ));
    }

    #[test]
    fn test_empty_move_set_rejected() {
        let demons = r#"[{
            "id": "imp", "name": "Imp", "level": 1,
            "hp": 10, "max_hp": 10, "atk": 3, "def": 1, "spd": 2,
            "moves": []
        }]"#;
        assert!(matches!(
            Catalog::from_json(SKILLS, demons),
            Err(ConfigError::EmptyMoveSet(_))
        ));
    }

    #[test]
    fn test_bad_crit_chance_rejected() {
        let demons = r#"[{
            "id": "imp", "name": "Imp", "level": 1,
            "hp": 10, "max_hp": 10, "atk": 3, "def": 1, "spd": 2,
            "crit_chance": 1.5,
            "moves": ["claw"]
        }]"#;
        assert!(matches!(
            Catalog::from_json(SKILLS, demons),
            Err(ConfigError::InvalidStat { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            SkillRegistry::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_demon_ids_sorted() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.demons.ids(),
            vec![
                "credit_card_fiend",
                "minimum_payment_imp",
                "mortgage_wyrm",
                "student_loan_golem"
            ]
        );
    }
}
