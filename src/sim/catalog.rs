//! Static weapon and casing data
//!
//! Built-in tables cover the stock arsenal; a JSON catalog can override or
//! extend them at startup.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Casing families
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CasingCategory {
    Pistol,
    Rifle,
    Shell,
    Rocket,
}

/// Visual and physical parameters for one casing family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CasingSpec {
    pub width: f32,
    pub height: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// 0xRRGGBB
    pub outline_color: u32,
    /// Base ejection speed (units/s)
    pub ejection_speed: f32,
    /// Base spin (radians/s)
    pub spin_rate: f32,
    /// Base life (seconds)
    pub life: f32,
}

impl CasingSpec {
    fn validate(&self, category: CasingCategory) -> Result<(), ConfigError> {
        let field = |name: &str| format!("casings.{category:?}.{name}");
        if !positive(self.life) {
            return Err(ConfigError::invalid(field("life"), "must be positive"));
        }
        if !positive(self.ejection_speed) {
            return Err(ConfigError::invalid(field("ejection_speed"), "must be positive"));
        }
        if !positive(self.width) || !positive(self.height) {
            return Err(ConfigError::invalid(field("size"), "must be positive"));
        }
        if !self.spin_rate.is_finite() {
            return Err(ConfigError::invalid(field("spin_rate"), "must be finite"));
        }
        Ok(())
    }
}

/// Finite and strictly greater than zero
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl CasingCategory {
    /// Built-in spec for this family
    pub fn spec(self) -> CasingSpec {
        match self {
            CasingCategory::Pistol => CasingSpec {
                width: 3.0,
                height: 1.5,
                color: 0xD4A017,
                outline_color: 0x8B6914,
                ejection_speed: 180.0,
                spin_rate: 18.0,
                life: 1.5,
            },
            CasingCategory::Rifle => CasingSpec {
                width: 5.0,
                height: 1.5,
                color: 0xC9A227,
                outline_color: 0x7A5C12,
                ejection_speed: 220.0,
                spin_rate: 22.0,
                life: 1.8,
            },
            CasingCategory::Shell => CasingSpec {
                width: 6.0,
                height: 2.5,
                color: 0xB22222,
                outline_color: 0x5C1010,
                ejection_speed: 150.0,
                spin_rate: 12.0,
                life: 2.2,
            },
            CasingCategory::Rocket => CasingSpec {
                width: 8.0,
                height: 3.0,
                color: 0x556B2F,
                outline_color: 0x2F3B1A,
                ejection_speed: 90.0,
                spin_rate: 6.0,
                life: 2.5,
            },
        }
    }
}

/// Trigger behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireMode {
    /// Fires whenever the interval has elapsed while the trigger is held
    Auto,
    /// Needs a fresh trigger press per shot
    #[default]
    SemiAuto,
}

/// Nominal on-screen size of the weapon sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sizing {
    pub width: f32,
    pub height: f32,
}

/// Static configuration of a weapon type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponKind {
    pub name: String,
    #[serde(default)]
    pub fire_mode: FireMode,
    /// Minimum gap between shots (milliseconds)
    pub fire_interval_ms: f64,
    pub capacity: u32,
    /// Damage per trigger pull (split across pellets)
    pub damage: f32,
    /// Units/s
    pub projectile_speed: f32,
    /// Units travelled before expiry
    pub projectile_range: f32,
    /// Downward acceleration on projectiles (units/s², 0 = straight line)
    #[serde(default)]
    pub projectile_gravity: f32,
    /// Sub-projectiles per shot; anything `<= 1` fires a single projectile
    #[serde(default)]
    pub pellet_count: Option<u32>,
    /// Total fan angle for pellets (radians)
    #[serde(default)]
    pub spread_angle: f32,
    pub sizing: Sizing,
    /// Ratio position of the grip on the weapon bounds
    pub grip_ratio: Vec2,
    /// Ratio position of the muzzle on the weapon bounds
    pub muzzle_ratio: Vec2,
    /// Ratio position of the ejection port (defaults between grip and muzzle)
    #[serde(default)]
    pub ejection_ratio: Option<Vec2>,
    pub casing: CasingCategory,
    /// Rounds that burst into particles when they expire
    #[serde(default)]
    pub explosion_radius: Option<f32>,
}

impl WeaponKind {
    /// Pellet count when the weapon actually fans out
    pub fn pellets(&self) -> Option<u32> {
        self.pellet_count.filter(|&n| n > 1)
    }

    pub fn pistol() -> Self {
        Self {
            name: "pistol".into(),
            fire_mode: FireMode::SemiAuto,
            fire_interval_ms: 250.0,
            capacity: 12,
            damage: 20.0,
            projectile_speed: 900.0,
            projectile_range: 700.0,
            projectile_gravity: 0.0,
            pellet_count: None,
            spread_angle: 0.0,
            sizing: Sizing {
                width: 24.0,
                height: 14.0,
            },
            grip_ratio: Vec2::new(0.25, 0.3),
            muzzle_ratio: Vec2::new(1.0, 0.75),
            ejection_ratio: None,
            casing: CasingCategory::Pistol,
            explosion_radius: None,
        }
    }

    pub fn rifle() -> Self {
        Self {
            name: "rifle".into(),
            fire_mode: FireMode::Auto,
            fire_interval_ms: 100.0,
            capacity: 30,
            damage: 15.0,
            projectile_speed: 1400.0,
            projectile_range: 1200.0,
            pellet_count: None,
            sizing: Sizing {
                width: 48.0,
                height: 14.0,
            },
            grip_ratio: Vec2::new(0.3, 0.3),
            muzzle_ratio: Vec2::new(1.0, 0.7),
            ejection_ratio: Some(Vec2::new(0.5, 0.75)),
            casing: CasingCategory::Rifle,
            ..Self::pistol()
        }
    }

    pub fn shotgun() -> Self {
        Self {
            name: "shotgun".into(),
            fire_mode: FireMode::SemiAuto,
            fire_interval_ms: 700.0,
            capacity: 6,
            damage: 60.0,
            projectile_speed: 800.0,
            projectile_range: 450.0,
            pellet_count: Some(6),
            spread_angle: 0.35,
            sizing: Sizing {
                width: 44.0,
                height: 12.0,
            },
            grip_ratio: Vec2::new(0.3, 0.3),
            muzzle_ratio: Vec2::new(1.0, 0.7),
            casing: CasingCategory::Shell,
            ..Self::pistol()
        }
    }

    pub fn launcher() -> Self {
        Self {
            name: "launcher".into(),
            fire_mode: FireMode::SemiAuto,
            fire_interval_ms: 1200.0,
            capacity: 1,
            damage: 100.0,
            projectile_speed: 500.0,
            projectile_range: 900.0,
            projectile_gravity: 150.0,
            sizing: Sizing {
                width: 56.0,
                height: 16.0,
            },
            grip_ratio: Vec2::new(0.4, 0.3),
            muzzle_ratio: Vec2::new(1.0, 0.6),
            casing: CasingCategory::Rocket,
            explosion_radius: Some(60.0),
            ..Self::pistol()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let field = |name: &str| format!("{}.{name}", self.name);
        if self.capacity == 0 {
            return Err(ConfigError::invalid(field("capacity"), "must be at least 1"));
        }
        if self.fire_interval_ms.is_nan() || self.fire_interval_ms < 0.0 {
            return Err(ConfigError::invalid(
                field("fire_interval_ms"),
                "must be non-negative",
            ));
        }
        if !positive(self.sizing.width) || !positive(self.sizing.height) {
            return Err(ConfigError::invalid(field("sizing"), "must be positive"));
        }
        // Projectiles only expire by distance travelled
        if !positive(self.projectile_speed) {
            return Err(ConfigError::invalid(field("projectile_speed"), "must be positive"));
        }
        if !positive(self.projectile_range) {
            return Err(ConfigError::invalid(field("projectile_range"), "must be positive"));
        }
        if !self.damage.is_finite() {
            return Err(ConfigError::invalid(field("damage"), "must be finite"));
        }
        if !self.spread_angle.is_finite() {
            return Err(ConfigError::invalid(field("spread_angle"), "must be finite"));
        }
        if !self.projectile_gravity.is_finite() {
            return Err(ConfigError::invalid(field("projectile_gravity"), "must be finite"));
        }
        if self.explosion_radius.is_some_and(|r| !positive(r)) {
            return Err(ConfigError::invalid(field("explosion_radius"), "must be positive"));
        }
        Ok(())
    }
}

/// Weapon and casing tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub weapons: Vec<WeaponKind>,
    pub casings: BTreeMap<CasingCategory, CasingSpec>,
}

impl Catalog {
    /// Stock arsenal with built-in casing specs
    pub fn builtin() -> Self {
        let casings = [
            CasingCategory::Pistol,
            CasingCategory::Rifle,
            CasingCategory::Shell,
            CasingCategory::Rocket,
        ]
        .into_iter()
        .map(|c| (c, c.spec()))
        .collect();

        Self {
            weapons: vec![
                WeaponKind::pistol(),
                WeaponKind::rifle(),
                WeaponKind::shotgun(),
                WeaponKind::launcher(),
            ],
            casings,
        }
    }

    /// Parse a catalog; casing entries missing from the JSON use built-ins
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        for weapon in &catalog.weapons {
            weapon.validate()?;
        }
        for (category, spec) in &catalog.casings {
            spec.validate(*category)?;
        }
        for (category, spec) in Self::builtin().casings {
            catalog.casings.entry(category).or_insert(spec);
        }
        Ok(catalog)
    }

    pub fn weapon(&self, name: &str) -> Option<&WeaponKind> {
        self.weapons.iter().find(|w| w.name == name)
    }

    pub fn casing(&self, category: CasingCategory) -> CasingSpec {
        self.casings
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pellets_ignores_degenerate_counts() {
        let mut kind = WeaponKind::shotgun();
        assert_eq!(kind.pellets(), Some(6));
        kind.pellet_count = Some(1);
        assert_eq!(kind.pellets(), None);
        kind.pellet_count = Some(0);
        assert_eq!(kind.pellets(), None);
    }

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.weapon("rifle").map(|w| w.fire_mode), Some(FireMode::Auto));
        assert!(catalog.weapon("railgun").is_none());
        assert_eq!(catalog.casing(CasingCategory::Shell), CasingCategory::Shell.spec());
    }

    #[test]
    fn test_json_catalog_fills_missing_casings() {
        let json = r#"{
            "weapons": [{
                "name": "smg",
                "fire_mode": "Auto",
                "fire_interval_ms": 60,
                "capacity": 40,
                "damage": 9,
                "projectile_speed": 1000,
                "projectile_range": 600,
                "sizing": { "width": 30, "height": 12 },
                "grip_ratio": [0.3, 0.3],
                "muzzle_ratio": [1.0, 0.7],
                "casing": "Pistol"
            }],
            "casings": {
                "Pistol": { "width": 2, "height": 1, "color": 1, "outline_color": 2,
                            "ejection_speed": 100, "spin_rate": 5, "life": 1 }
            }
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let smg = catalog.weapon("smg").unwrap();
        assert_eq!(smg.pellet_count, None);
        assert_eq!(smg.ejection_ratio, None);
        assert_eq!(catalog.casing(CasingCategory::Pistol).ejection_speed, 100.0);
        assert_eq!(catalog.casing(CasingCategory::Rocket), CasingCategory::Rocket.spec());
    }

    fn rejected_field(catalog: &Catalog) -> String {
        let json = serde_json::to_string(catalog).unwrap();
        match Catalog::from_json(&json) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected invalid catalog, got {other:?}"),
        }
    }

    fn with_weapon(kind: WeaponKind) -> Catalog {
        Catalog {
            weapons: vec![kind],
            casings: BTreeMap::new(),
        }
    }

    fn with_casing(spec: CasingSpec) -> Catalog {
        Catalog {
            weapons: Vec::new(),
            casings: BTreeMap::from([(CasingCategory::Rifle, spec)]),
        }
    }

    #[test]
    fn test_json_catalog_rejects_zero_capacity() {
        let mut kind = WeaponKind::pistol();
        kind.capacity = 0;
        assert_eq!(rejected_field(&with_weapon(kind)), "pistol.capacity");
    }

    #[test]
    fn test_json_catalog_rejects_bad_ballistics() {
        let stalled = WeaponKind {
            projectile_speed: 0.0,
            ..WeaponKind::rifle()
        };
        assert_eq!(rejected_field(&with_weapon(stalled)), "rifle.projectile_speed");

        let no_range = WeaponKind {
            projectile_range: -5.0,
            ..WeaponKind::rifle()
        };
        assert_eq!(rejected_field(&with_weapon(no_range)), "rifle.projectile_range");

        let dud = WeaponKind {
            explosion_radius: Some(0.0),
            ..WeaponKind::launcher()
        };
        assert_eq!(rejected_field(&with_weapon(dud)), "launcher.explosion_radius");
    }

    #[test]
    fn test_non_finite_weapon_numbers_rejected() {
        // serde_json cannot carry NaN, so validate directly
        let kind = WeaponKind {
            damage: f32::NAN,
            ..WeaponKind::pistol()
        };
        assert!(kind.validate().is_err());
        let kind = WeaponKind {
            spread_angle: f32::INFINITY,
            ..WeaponKind::shotgun()
        };
        assert!(kind.validate().is_err());
    }

    #[test]
    fn test_json_catalog_rejects_bad_casings() {
        let rifle = CasingCategory::Rifle.spec();
        let cases = [
            (CasingSpec { life: 0.0, ..rifle }, "casings.Rifle.life"),
            (CasingSpec { life: -1.0, ..rifle }, "casings.Rifle.life"),
            (CasingSpec { ejection_speed: 0.0, ..rifle }, "casings.Rifle.ejection_speed"),
            (CasingSpec { width: 0.0, ..rifle }, "casings.Rifle.size"),
        ];
        for (spec, field) in cases {
            assert_eq!(rejected_field(&with_casing(spec)), field);
        }

        let spinning = CasingSpec {
            spin_rate: f32::INFINITY,
            ..rifle
        };
        assert!(spinning.validate(CasingCategory::Rifle).is_err());
    }

    #[test]
    fn test_builtins_pass_validation() {
        let catalog = Catalog::builtin();
        for weapon in &catalog.weapons {
            assert!(weapon.validate().is_ok(), "{}", weapon.name);
        }
        for (category, spec) in &catalog.casings {
            assert!(spec.validate(*category).is_ok(), "{category:?}");
        }
    }
}
