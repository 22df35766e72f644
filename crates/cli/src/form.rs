//! Interactive analysis form.
//!
//! Three steps mirroring the submission flow: location, activity, then the
//! responsible party. Prompts render on stderr, so stdout stays clean for
//! `--json`. Every completed step feeds the debounced autosaver, which is
//! why a half-finished form survives an abort and can be picked up again
//! with `viability resume`.

use anyhow::{Context, Result};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::sync::Arc;

use viability_session::{DraftAutosaver, AUTOSAVE_DEBOUNCE};
use viability_types::{validate, CompanyData};

use crate::App;

pub(crate) async fn fill_company(initial: CompanyData, app: &App) -> Result<CompanyData> {
    let autosaver = DraftAutosaver::spawn(
        app.store.clone(),
        Arc::clone(&app.manager),
        AUTOSAVE_DEBOUNCE,
    );

    let company = run_step(location_step, initial).await?;
    autosaver.edit(company.clone()).await;

    let company = run_step(activity_step, company).await?;
    autosaver.edit(company.clone()).await;

    let company = run_step(responsible_step, company).await?;
    autosaver.edit(company.clone()).await;

    autosaver.shutdown().await;
    Ok(company)
}

/// Prompts block on the terminal, so each step runs off the async runtime.
async fn run_step(
    step: fn(CompanyData) -> Result<CompanyData>,
    company: CompanyData,
) -> Result<CompanyData> {
    tokio::task::spawn_blocking(move || step(company))
        .await
        .context("form step crashed")?
}

fn location_step(mut company: CompanyData) -> Result<CompanyData> {
    let theme = ColorfulTheme::default();
    eprintln!("{}", style("Step 1 of 3: location").bold());

    company.cep = Input::with_theme(&theme)
        .with_prompt("CEP")
        .with_initial_text(company.cep)
        .validate_with(|value: &String| -> Result<(), &str> {
            if validate::cep_is_valid(value) {
                Ok(())
            } else {
                Err("CEP must match 00000-000")
            }
        })
        .interact_text()?;

    company.logradouro = Input::with_theme(&theme)
        .with_prompt("Street")
        .with_initial_text(company.logradouro)
        .interact_text()?;

    company.numero = Input::with_theme(&theme)
        .with_prompt("Number")
        .with_initial_text(company.numero)
        .interact_text()?;

    company.complemento = Input::with_theme(&theme)
        .with_prompt("Complement")
        .with_initial_text(company.complemento)
        .allow_empty(true)
        .interact_text()?;

    company.bairro = Input::with_theme(&theme)
        .with_prompt("Neighborhood")
        .with_initial_text(company.bairro)
        .interact_text()?;

    company.cidade = Input::with_theme(&theme)
        .with_prompt("City")
        .with_initial_text(company.cidade)
        .interact_text()?;

    let default_uf = validate::UFS
        .iter()
        .position(|uf| *uf == company.uf)
        .unwrap_or(0);
    let picked = Select::with_theme(&theme)
        .with_prompt("UF")
        .items(&validate::UFS)
        .default(default_uf)
        .interact()?;
    company.uf = validate::UFS[picked].to_string();

    Ok(company)
}

fn activity_step(mut company: CompanyData) -> Result<CompanyData> {
    let theme = ColorfulTheme::default();
    eprintln!("{}", style("Step 2 of 3: activity").bold());

    company.cnae = Input::with_theme(&theme)
        .with_prompt("CNAE code")
        .with_initial_text(company.cnae)
        .validate_with(|value: &String| -> Result<(), &str> {
            if validate::cnae_is_valid(value) {
                Ok(())
            } else {
                Err("CNAE must match 0000-0/00")
            }
        })
        .interact_text()?;

    company.capital_inicial = Input::with_theme(&theme)
        .with_prompt("Opening capital (BRL)")
        .default(company.capital_inicial)
        .show_default(company.capital_inicial > 0.0)
        .validate_with(|value: &f64| -> Result<(), &str> {
            if *value > 0.0 {
                Ok(())
            } else {
                Err("opening capital must be above zero")
            }
        })
        .interact_text()?;

    company.mei = Confirm::with_theme(&theme)
        .with_prompt("Register as MEI?")
        .default(company.mei)
        .interact()?;

    Ok(company)
}

fn responsible_step(mut company: CompanyData) -> Result<CompanyData> {
    let theme = ColorfulTheme::default();
    eprintln!("{}", style("Step 3 of 3: responsible party").bold());

    company.natureza_juridica = Input::with_theme(&theme)
        .with_prompt("Legal nature")
        .with_initial_text(company.natureza_juridica)
        .interact_text()?;

    company.qualificacao_responsavel = Input::with_theme(&theme)
        .with_prompt("Responsible party qualification")
        .with_initial_text(company.qualificacao_responsavel)
        .interact_text()?;

    Ok(company)
}
