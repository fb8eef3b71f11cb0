//! Template Selector: maps a profile onto exactly one registry template.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//! 1. `experience_years >= 5` and more than 5 skills → `tech-developer`
//! 2. `experience_years >= 10` → `business-executive`
//! 3. otherwise → `modern-minimal`
//!
//! Because rule 1 is checked first, a profile with 10+ years and 6+ skills lands on
//! `tech-developer`, never `business-executive`.
//!
//! If the candidate id is not in the registry, the registry's first template is returned.
//! Selection is pure and never fails for a valid profile.

use serde::Serialize;
use tracing::{debug, warn};

use crate::profile::models::{Profile, ProfileError};
use crate::templates::registry::{Registry, TemplateDescriptor};

pub const TECH_DEVELOPER: &str = "tech-developer";
pub const BUSINESS_EXECUTIVE: &str = "business-executive";
pub const MODERN_MINIMAL: &str = "modern-minimal";

const TECH_MIN_YEARS: u32 = 5;
/// Rule 1 needs strictly more skills than this.
const TECH_SKILL_FLOOR: usize = 5;
const EXECUTIVE_MIN_YEARS: u32 = 10;

/// The attributes the rules look at, after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileTraits {
    pub experience_years: u32,
    pub skill_count: usize,
}

impl ProfileTraits {
    pub fn from_profile(profile: &Profile) -> Result<Self, ProfileError> {
        Ok(Self {
            experience_years: profile.experience_years()?,
            skill_count: profile.skills().len(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Selection<'r> {
    pub template: &'r TemplateDescriptor,
    pub candidate_id: &'static str,
    /// True when `candidate_id` was absent and the first template was used.
    pub fallback_used: bool,
}

/// Candidate id from rule evaluation, before registry lookup.
pub fn candidate_id(traits: ProfileTraits) -> &'static str {
    if traits.experience_years >= TECH_MIN_YEARS && traits.skill_count > TECH_SKILL_FLOOR {
        TECH_DEVELOPER
    } else if traits.experience_years >= EXECUTIVE_MIN_YEARS {
        BUSINESS_EXECUTIVE
    } else {
        MODERN_MINIMAL
    }
}

/// Full selection with lookup details.
pub fn select<'r>(profile: &Profile, registry: &'r Registry) -> Result<Selection<'r>, ProfileError> {
    let traits = ProfileTraits::from_profile(profile)?;
    let candidate = candidate_id(traits);
    debug!(
        "Template rules: {} years, {} skills -> {}",
        traits.experience_years, traits.skill_count, candidate
    );

    let selection = match registry.get(candidate) {
        Some(template) => Selection {
            template,
            candidate_id: candidate,
            fallback_used: false,
        },
        None => {
            let template = registry.default_template();
            warn!(
                "Template '{}' not in registry, falling back to '{}'",
                candidate, template.id
            );
            Selection {
                template,
                candidate_id: candidate,
                fallback_used: true,
            }
        }
    };

    Ok(selection)
}

/// Chosen template for a profile.
#[cfg(test)]
pub fn select_template<'r>(
    profile: &Profile,
    registry: &'r Registry,
) -> Result<&'r TemplateDescriptor, ProfileError> {
    select(profile, registry).map(|s| s.template)
}
