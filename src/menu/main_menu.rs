use crate::config::save::save_settings;
use crate::config::types::{Config, HighlightSettings, Language};
use crate::menu::handlers::run_highlight_extractor;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_extract"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_highlight_extractor(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_highlight"),
            t!("settings.opt_reset"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_highlight_settings_menu(term, config)?,
            Some(1) => reset_highlight_settings(config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum HighlightField {
    Duration,
    Cooldown,
    Threshold,
    SampleInterval,
    OutputFrameRate,
    OutputCrf,
    Extension,
}

impl HighlightField {
    const ALL: [Self; 7] = [
        Self::Duration,
        Self::Cooldown,
        Self::Threshold,
        Self::SampleInterval,
        Self::OutputFrameRate,
        Self::OutputCrf,
        Self::Extension,
    ];

    fn label(self) -> String {
        let label = match self {
            Self::Duration => t!("settings.highlight.duration"),
            Self::Cooldown => t!("settings.highlight.cooldown"),
            Self::Threshold => t!("settings.highlight.threshold"),
            Self::SampleInterval => t!("settings.highlight.sample_interval"),
            Self::OutputFrameRate => t!("settings.highlight.output_frame_rate"),
            Self::OutputCrf => t!("settings.highlight.output_crf"),
            Self::Extension => t!("settings.highlight.extension"),
        };
        label.to_string()
    }

    fn current_value(self, settings: &HighlightSettings) -> String {
        match self {
            Self::Duration => settings.highlight_duration.to_string(),
            Self::Cooldown => settings.cooldown_period.to_string(),
            Self::Threshold => settings.darkness_threshold.to_string(),
            Self::SampleInterval => settings.sample_interval_seconds.to_string(),
            Self::OutputFrameRate => settings.output_frame_rate.to_string(),
            Self::OutputCrf => settings.output_crf.to_string(),
            Self::Extension => settings.video_extension.clone(),
        }
    }

    /// 套用輸入值，回傳新的設定（驗證失敗時回傳錯誤訊息）
    fn apply(self, settings: &HighlightSettings, raw: &str) -> Result<HighlightSettings, String> {
        let raw = raw.trim();
        let mut updated = settings.clone();
        let parse_f64 = || raw.parse::<f64>().map_err(|e| e.to_string());

        match self {
            Self::Duration => updated.highlight_duration = parse_f64()?,
            Self::Cooldown => updated.cooldown_period = parse_f64()?,
            Self::Threshold => updated.darkness_threshold = parse_f64()?,
            Self::SampleInterval => updated.sample_interval_seconds = parse_f64()?,
            Self::OutputFrameRate => {
                updated.output_frame_rate = raw.parse().map_err(|e| format!("{e}"))?;
            }
            Self::OutputCrf => updated.output_crf = raw.parse().map_err(|e| format!("{e}"))?,
            Self::Extension => updated.video_extension = raw.to_string(),
        }

        updated.validate().map_err(|e| e.to_string())?;
        Ok(updated)
    }
}

/// 精華參數設定選單
fn show_highlight_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.highlight.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let items: Vec<String> = HighlightField::ALL
            .iter()
            .map(|field| {
                format!(
                    "{}: {}",
                    field.label(),
                    field.current_value(&config.settings.highlight)
                )
            })
            .collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.highlight.prompt"))
            .items(&items)
            .default(0)
            .interact_on_opt(term)?;

        // ESC pressed - return
        let Some(selection) = selection else {
            return Ok(());
        };

        let field = HighlightField::ALL[selection];
        let current = config.settings.highlight.clone();

        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(field.label())
            .default(field.current_value(&current))
            .validate_with(|input: &String| field.apply(&current, input).map(|_| ()))
            .interact_text_on(term)?;

        if let Ok(updated) = field.apply(&current, &raw) {
            if updated != current {
                config.settings.highlight = updated;
                save_settings(&config.settings)?;
                println!(
                    "\n{} {}",
                    style(t!("settings.saved")).green(),
                    field.current_value(&config.settings.highlight)
                );
                std::thread::sleep(std::time::Duration::from_secs(1));
            }
        }
    }
}

fn reset_highlight_settings(config: &mut Config) -> Result<()> {
    config.settings.highlight = HighlightSettings::default();
    save_settings(&config.settings)?;
    println!("\n{}", style(t!("settings.reset_done")).green());
    std::thread::sleep(std::time::Duration::from_secs(1));
    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];

    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_lang
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
