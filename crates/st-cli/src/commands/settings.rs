use std::path::PathBuf;

use clap::{Args, Subcommand};
use comfy_table::{ContentArrangement, Table};

use st_mechanics::{RollSettings, SettingKey};

use crate::config::{self, DEFAULT_SETTINGS_FILE};

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Show every setting and its value
    Show,

    /// Print one setting's value
    Get {
        /// Setting key, e.g. `default_diff`
        key: String,
    },

    /// Change a setting
    Set {
        /// Setting key, e.g. `xpl_spec`
        key: String,

        /// New value (`true`/`false` or a difficulty)
        value: String,
    },

    /// Restore every setting to its default
    Reset,

    /// Explain what each setting does
    Describe,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Settings file (missing means defaults)
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub action: SettingsAction,
}

pub fn run(args: &SettingsArgs) -> Result<(), String> {
    let mut settings = config::load_settings(&args.settings)?;
    let output = execute(&args.action, &mut settings)?;
    if matches!(args.action, SettingsAction::Set { .. } | SettingsAction::Reset) {
        config::save_settings(&args.settings, &settings)?;
    }
    print!("{output}");
    Ok(())
}

/// Apply one action to the settings, returning the rendered output.
pub fn execute(action: &SettingsAction, settings: &mut RollSettings) -> Result<String, String> {
    let output = match action {
        SettingsAction::Show => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Setting", "Value"]);
            for key in SettingKey::ALL {
                table.add_row(vec![key.to_string(), settings.get(key)]);
            }
            format!("{table}\n")
        }
        SettingsAction::Get { key } => {
            let key = key.parse::<SettingKey>().map_err(|e| e.to_string())?;
            format!("{}\n", settings.get(key))
        }
        SettingsAction::Set { key, value } => {
            let key = key.parse::<SettingKey>().map_err(|e| e.to_string())?;
            settings.set(key, value).map_err(|e| e.to_string())?;
            tracing::debug!(%key, value = %settings.get(key), "setting changed");
            let mut changed = vec![key];
            if key == SettingKey::Chronicles {
                changed.extend([
                    SettingKey::DefaultDifficulty,
                    SettingKey::ExplodeAlways,
                    SettingKey::IgnoreOnes,
                    SettingKey::NeverBotch,
                ]);
            }
            changed
                .into_iter()
                .map(|key| format!("  {key} = {}\n", settings.get(key)))
                .collect()
        }
        SettingsAction::Reset => {
            *settings = RollSettings::default();
            "  Settings reset to defaults.\n".to_string()
        }
        SettingsAction::Describe => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Setting", "Meaning"]);
            for key in SettingKey::ALL {
                table.add_row(vec![key.to_string(), key.description().to_string()]);
            }
            format!("{table}\n")
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut settings = RollSettings::default();
        let set = SettingsAction::Set {
            key: "default_diff".into(),
            value: "7".into(),
        };
        assert_eq!(execute(&set, &mut settings).unwrap(), "  default_diff = 7\n");
        let get = SettingsAction::Get {
            key: "default_diff".into(),
        };
        assert_eq!(execute(&get, &mut settings).unwrap(), "7\n");
    }

    #[test]
    fn rejects_bad_input() {
        let mut settings = RollSettings::default();
        let unknown = SettingsAction::Get {
            key: "nope".into(),
        };
        assert_eq!(
            execute(&unknown, &mut settings).unwrap_err(),
            "unknown setting `nope`"
        );
        let bad = SettingsAction::Set {
            key: "default_diff".into(),
            value: "12".into(),
        };
        assert!(execute(&bad, &mut settings).is_err());
        assert_eq!(settings, RollSettings::default());
    }

    #[test]
    fn chronicles_reports_implied_settings() {
        let mut settings = RollSettings::default();
        let set = SettingsAction::Set {
            key: "chronicles".into(),
            value: "true".into(),
        };
        assert_eq!(
            execute(&set, &mut settings).unwrap(),
            "  chronicles = true\n  default_diff = 8\n  xpl_always = true\n  \
             ignore_ones = true\n  never_botch = true\n"
        );
    }

    #[test]
    fn show_lists_every_key() {
        let mut settings = RollSettings::default();
        let out = execute(&SettingsAction::Show, &mut settings).unwrap();
        for key in SettingKey::ALL {
            assert!(out.contains(key.as_str()), "{key}");
        }
    }
}
