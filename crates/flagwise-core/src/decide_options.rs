use std::str::FromStr;

/// Flags adjusting how decisions are computed and reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecideOptions {
    /// Do not dispatch decision events for experiment decisions
    pub disable_decision_event: bool,
    /// Keep only enabled decisions in `decide_all` and `decide_for_keys`
    pub enabled_flags_only: bool,
    /// Accepted for compatibility; no user profile service is consulted
    pub ignore_user_profile_service: bool,
    pub include_reasons: bool,
    pub exclude_variables: bool,
}

impl DecideOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of two option sets
    pub fn merge(&self, other: &DecideOptions) -> DecideOptions {
        DecideOptions {
            disable_decision_event: self.disable_decision_event || other.disable_decision_event,
            enabled_flags_only: self.enabled_flags_only || other.enabled_flags_only,
            ignore_user_profile_service: self.ignore_user_profile_service
                || other.ignore_user_profile_service,
            include_reasons: self.include_reasons || other.include_reasons,
            exclude_variables: self.exclude_variables || other.exclude_variables,
        }
    }

    /// Enable the option with the given `SCREAMING_SNAKE_CASE` name
    pub fn set(&mut self, name: &str) -> Result<(), UnknownDecideOption> {
        match name {
            "DISABLE_DECISION_EVENT" => self.disable_decision_event = true,
            "ENABLED_FLAGS_ONLY" => self.enabled_flags_only = true,
            "IGNORE_USER_PROFILE_SERVICE" => self.ignore_user_profile_service = true,
            "INCLUDE_REASONS" => self.include_reasons = true,
            "EXCLUDE_VARIABLES" => self.exclude_variables = true,
            _ => return Err(UnknownDecideOption(name.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown decide option {0:?}")]
pub struct UnknownDecideOption(pub String);

impl FromStr for DecideOptions {
    type Err = UnknownDecideOption;

    /// Parse a comma separated list such as `"DISABLE_DECISION_EVENT,INCLUDE_REASONS"`
    fn from_str(list: &str) -> Result<Self, Self::Err> {
        let mut options = DecideOptions::new();
        for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            options.set(name)?;
        }
        Ok(options)
    }
}
