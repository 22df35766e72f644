//! Commands that talk to the analysis backend, plus the local account state.

use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;

use viability_api::{ApiClient, Credentials, RegisterRequest, UserProfile};
use viability_store::Namespace;

use crate::helpers_cache::HelpersCache;
use crate::{
    output, print_stdout, render, App, HelpersArgs, HistoryArgs, HistoryDeleteArgs,
    HistoryShowArgs, LoginArgs, RegisterArgs, WhoamiArgs,
};

pub(crate) async fn run_login(args: LoginArgs, app: &App) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password().await?,
    };
    let api = ApiClient::new(app.api_url.as_str())?;
    let credentials = Credentials {
        email: args.email,
        password,
    };
    let data = api.login(&credentials).await?;

    app.store.set(Namespace::Token, &data.token);
    app.store.set(Namespace::Profile, &data.usuario);
    log::info!("Signed in as {}", data.usuario.email);

    if args.json {
        let out = output::WhoamiOutput {
            signed_in: true,
            profile: Some(data.usuario),
        };
        print_stdout(&serde_json::to_string_pretty(&out)?)
    } else {
        print_stdout(&format!(
            "Signed in as {} <{}>",
            data.usuario.name, data.usuario.email
        ))
    }
}

pub(crate) async fn run_register(args: RegisterArgs, app: &App) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password().await?,
    };
    let api = ApiClient::new(app.api_url.as_str())?;
    let request = RegisterRequest {
        name: args.name,
        email: args.email,
        company: args.company,
        phone: args.phone,
        password,
    };
    let profile = api.register(&request).await?;

    if args.json {
        let out = output::RegisterOutput {
            registered: true,
            profile,
        };
        print_stdout(&serde_json::to_string_pretty(&out)?)
    } else {
        print_stdout(&format!(
            "Account created for {}. Run `viability login` to sign in.",
            profile.email
        ))
    }
}

pub(crate) fn run_logout(app: &App) -> Result<()> {
    app.store.remove(Namespace::Token);
    app.store.remove(Namespace::Profile);
    print_stdout("Signed out.")
}

pub(crate) fn run_whoami(args: &WhoamiArgs, app: &App) -> Result<()> {
    let token: Option<String> = app.store.get(Namespace::Token);
    let profile: Option<UserProfile> = app.store.get(Namespace::Profile);
    let profile = profile.filter(|_| token.is_some());

    if args.json {
        let out = output::WhoamiOutput {
            signed_in: profile.is_some(),
            profile,
        };
        print_stdout(&serde_json::to_string_pretty(&out)?)
    } else if let Some(profile) = profile {
        print_stdout(&format!("Signed in as {} <{}>", profile.name, profile.email))
    } else {
        print_stdout("Not signed in.")
    }
}

pub(crate) async fn run_helpers(args: HelpersArgs, app: &App) -> Result<()> {
    let table = args.table.as_domain();
    let cache = HelpersCache::new(&app.store);

    let cached = (!args.refresh).then(|| cache.fresh(table)).flatten();
    let (entries, from_cache) = match cached {
        Some(entries) => (entries, true),
        None => {
            let token: Option<String> = app.store.get(Namespace::Token);
            let api = ApiClient::new(app.api_url.as_str())?.with_token(token);
            let entries = api.helper_table(table).await?;
            cache.put(table, &entries);
            (entries, false)
        }
    };

    if args.json {
        let out = output::HelpersOutput {
            table: table.as_str(),
            cached: from_cache,
            entries: &entries,
        };
        print_stdout(&serde_json::to_string_pretty(&out)?)
    } else {
        print_stdout(&render::helpers_table(table, &entries))
    }
}

pub(crate) async fn run_history(args: &HistoryArgs, app: &App) -> Result<()> {
    let entries = authed_client(app)?.history().await?;
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&entries)?)
    } else if entries.is_empty() {
        print_stdout("No remote history.")
    } else {
        print_stdout(&render::history_table(&entries))
    }
}

pub(crate) async fn run_history_show(args: &HistoryShowArgs, app: &App) -> Result<()> {
    let detail = authed_client(app)?.history_detail(args.id).await?;
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&detail)?)
    } else {
        print_stdout(&render::history_detail_card(&detail))
    }
}

pub(crate) async fn run_history_delete(args: &HistoryDeleteArgs, app: &App) -> Result<()> {
    authed_client(app)?.delete_history(args.id).await?;
    print_stdout(&format!("Deleted history entry {}", args.id))
}

fn authed_client(app: &App) -> Result<ApiClient> {
    let token: Option<String> = app.store.get(Namespace::Token);
    Ok(ApiClient::new(app.api_url.as_str())?.with_token(token))
}

async fn prompt_password() -> Result<String> {
    let password = tokio::task::spawn_blocking(|| {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()
    })
    .await
    .context("password prompt crashed")??;
    Ok(password)
}
