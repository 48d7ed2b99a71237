use crate::{
    emit_json, AssetCommand, AssetDetails, Context, HistoryCommand, HistoryDetails, OutputMode,
    ScreenCommand, ScreenDetails, StoreCommand, StoreDetails,
};
use std::path::{Path, PathBuf};
use storecard::config::{self, StorecardConfig};
use storecard::fields::{or_dash, parse_date};
use storecard::report::{self, StoreReport};
use storecard::ui::{self, Icons};
use storecard::{
    AssetInput, Database, Error, HistoryInput, ScreenInput, Store, StoreInput,
};

/// Find a store by numeric id, falling back to its code
pub fn resolve_store(db: &Database, key: &str) -> anyhow::Result<Store> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>() {
        match db.get_store(id) {
            Ok(store) => return Ok(store),
            Err(Error::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    db.find_store_by_code(key)?
        .ok_or_else(|| anyhow::anyhow!("no store with id or code `{}`", key))
}

fn set(field: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        *field = Some(v);
    }
}

// ========== init / stats ==========

pub fn run_init(
    output: OutputMode,
    config_path: &Path,
    db_path: &Path,
    force: bool,
) -> anyhow::Result<()> {
    let config = StorecardConfig {
        database: Some(db_path.to_string_lossy().into_owned()),
        reports_dir: None,
    };
    config::write_config(config_path, &config, force)?;
    config::ensure_parent_dir(db_path)?;
    let db = Database::open(db_path)?;

    if output.is_human() {
        ui::header(Icons::GEAR, "Storecard initialized");
        ui::info("Config", &config_path.display().to_string());
        ui::info("Database", &db_path.display().to_string());
        ui::summary_row("Schema:", &db.migration_report().to_string());
    } else {
        emit_json(&serde_json::json!({
            "config": config_path,
            "database": db_path,
            "migration": db.migration_report(),
        }))?;
    }
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let stats = ctx.db.stats()?;
    if !ctx.output.is_human() {
        return emit_json(&stats);
    }

    let location = ctx
        .db
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "in memory".to_string());
    ui::header(Icons::STATS, &format!("Storecard Statistics ({})", location));
    println!(
        "{}",
        ui::kv_table(&[
            ("Stores", stats.stores.to_string()),
            ("Screens", stats.screens.to_string()),
            ("Assets", stats.assets.to_string()),
            ("History entries", stats.history.to_string()),
            ("Schema version", stats.schema_version.to_string()),
        ])
    );
    if !stats.is_current() {
        ui::warn("schema version is not current");
    }
    Ok(())
}

// ========== stores ==========

impl StoreDetails {
    fn apply(self, input: &mut StoreInput) {
        set(&mut input.address, self.address);
        set(&mut input.zone, self.zone);
        set(&mut input.region, self.region);
        set(&mut input.contact.name, self.contact_name);
        set(&mut input.contact.phone, self.contact_phone);
        set(&mut input.contact_2.name, self.contact_name_2);
        set(&mut input.contact_2.phone, self.contact_phone_2);
        set(&mut input.email, self.email);
        set(&mut input.notes, self.notes);
    }
}

pub fn run_store(ctx: &Context, action: StoreCommand) -> anyhow::Result<()> {
    let db = &ctx.db;
    match action {
        StoreCommand::Create { code, name, details } => {
            let mut input = StoreInput::new(code, name);
            details.apply(&mut input);
            let store = db.create_store(&input)?;
            saved(ctx.output, "store", store.id, &store)
        }
        StoreCommand::List => {
            let stores = db.list_stores()?;
            print_stores(ctx.output, &stores, "No stores recorded")
        }
        StoreCommand::Search { query } => {
            let stores = db.search_stores(&query)?;
            if ctx.output.is_human() {
                ui::header(Icons::SEARCH, &format!("Searching for: '{}'", query.trim()));
            }
            print_stores(ctx.output, &stores, "No stores found")
        }
        StoreCommand::Show { store } => {
            let store = resolve_store(db, &store)?;
            show_card(ctx.output, &StoreReport::load(db, store.id)?)
        }
        StoreCommand::Update { store, code, name, details } => {
            let current = resolve_store(db, &store)?;
            let mut input = StoreInput::from(&current);
            if let Some(code) = code {
                input.code = code;
            }
            if let Some(name) = name {
                input.name = name;
            }
            details.apply(&mut input);
            let store = db.update_store(current.id, &input)?;
            saved(ctx.output, "store", store.id, &store)
        }
        StoreCommand::Delete { store, yes } => {
            let store = resolve_store(db, &store)?;
            if !yes {
                anyhow::bail!(
                    "deleting {} also removes its screens, assets and history; rerun with --yes",
                    store.label()
                );
            }
            db.delete_store(store.id)?;
            deleted(ctx.output, "store", store.id)
        }
    }
}

fn print_stores(output: OutputMode, stores: &[Store], empty: &str) -> anyhow::Result<()> {
    if !output.is_human() {
        return emit_json(stores);
    }
    if stores.is_empty() {
        println!("{}", ui::muted(empty));
    } else {
        println!("{}", ui::rows_table(&ui::record_rows::<_, ui::StoreRow>(stores)));
    }
    Ok(())
}

/// Profile, screens, assets and history of one store
fn show_card(output: OutputMode, card: &StoreReport) -> anyhow::Result<()> {
    if !output.is_human() {
        return emit_json(&serde_json::json!({
            "store": card.store,
            "screens": card.screens,
            "assets": card.assets,
            "history": card.history,
        }));
    }

    let store = &card.store;
    let dash = |v: &Option<String>| or_dash(v.as_deref()).to_string();
    ui::header(Icons::STORE, &store.label());
    let mut profile = vec![
        ("Code", store.code.clone()),
        ("Name", store.name.clone()),
        ("Address", dash(&store.address)),
        ("Zone", dash(&store.zone)),
        ("Region", dash(&store.region)),
        ("Contact 1", store.contact.summary()),
    ];
    if !store.contact_2.is_empty() {
        profile.push(("Contact 2", store.contact_2.summary()));
    }
    profile.extend([
        ("Email", dash(&store.email)),
        ("Notes", dash(&store.notes)),
        ("Created", store.created_at.clone()),
    ]);
    println!("{}", ui::kv_table(&profile));

    ui::section(Icons::SCREEN, &format!("Screens ({})", card.screens.len()));
    print_rows(&ui::record_rows::<_, ui::ScreenRow>(&card.screens), "No screens recorded");

    ui::section(Icons::TOOLBOX, &format!("Assets ({})", card.assets.len()));
    print_rows(&ui::record_rows::<_, ui::AssetRow>(&card.assets), "No assets recorded");

    ui::section(Icons::TICKET, &format!("History ({})", card.history.len()));
    print_rows(&ui::record_rows::<_, ui::HistoryRow>(&card.history), "No history recorded");
    Ok(())
}

fn print_rows<T: tabled::Tabled>(rows: &[T], empty: &str) {
    if rows.is_empty() {
        println!("{}", ui::muted(empty));
    } else {
        println!("{}", ui::rows_table(rows));
    }
}

fn saved<T: serde::Serialize>(output: OutputMode, kind: &str, id: i64, record: &T) -> anyhow::Result<()> {
    if output.is_human() {
        ui::record_saved(kind, id);
        Ok(())
    } else {
        emit_json(record)
    }
}

fn deleted(output: OutputMode, kind: &str, id: i64) -> anyhow::Result<()> {
    if output.is_human() {
        ui::record_deleted(kind, id);
        Ok(())
    } else {
        emit_json(&serde_json::json!({ "deleted": kind, "id": id }))
    }
}

// ========== screens ==========

impl ScreenDetails {
    fn apply(self, input: &mut ScreenInput) -> anyhow::Result<()> {
        if let Some(orientation) = self.orientation {
            input.orientation = orientation.parse()?;
        }
        if let Some(port) = self.input {
            input.input_port = port.parse()?;
        }
        if let Some(status) = self.status {
            input.status = status.parse()?;
        }
        set(&mut input.notes, self.notes);
        Ok(())
    }
}

pub fn run_screen(ctx: &Context, action: ScreenCommand) -> anyhow::Result<()> {
    let db = &ctx.db;
    match action {
        ScreenCommand::Add { store, brand, reference, inches, position, details } => {
            let store = resolve_store(db, &store)?;
            let mut input = ScreenInput::new(brand, reference, inches, position);
            details.apply(&mut input)?;
            let screen = db.add_screen(store.id, &input)?;
            saved(ctx.output, "screen", screen.id, &screen)
        }
        ScreenCommand::List { store } => {
            let store = resolve_store(db, &store)?;
            let screens = db.list_screens(store.id)?;
            if !ctx.output.is_human() {
                return emit_json(&screens);
            }
            ui::header(Icons::SCREEN, &format!("Screens of {}", store.label()));
            print_rows(&ui::record_rows::<_, ui::ScreenRow>(&screens), "No screens recorded");
            Ok(())
        }
        ScreenCommand::Update { id, brand, reference, inches, position, details } => {
            let mut input = ScreenInput::from(&db.get_screen(id)?);
            if let Some(brand) = brand {
                input.brand = brand;
            }
            if let Some(reference) = reference {
                input.reference = reference;
            }
            if let Some(inches) = inches {
                input.inches = inches;
            }
            if let Some(position) = position {
                input.position = position;
            }
            details.apply(&mut input)?;
            let screen = db.update_screen(id, &input)?;
            saved(ctx.output, "screen", screen.id, &screen)
        }
        ScreenCommand::Delete { id } => {
            db.delete_screen(id)?;
            deleted(ctx.output, "screen", id)
        }
    }
}

// ========== assets ==========

impl AssetDetails {
    fn apply(self, input: &mut AssetInput) -> anyhow::Result<()> {
        set(&mut input.brand_model, self.brand_model);
        set(&mut input.serial, self.serial);
        set(&mut input.lot, self.lot);
        set(&mut input.position, self.position);
        if let Some(status) = self.status {
            input.status = status.parse()?;
        }
        set(&mut input.notes, self.notes);
        Ok(())
    }
}

pub fn run_asset(ctx: &Context, action: AssetCommand) -> anyhow::Result<()> {
    let db = &ctx.db;
    match action {
        AssetCommand::Add { store, asset_type, details } => {
            let store = resolve_store(db, &store)?;
            let mut input = AssetInput::new(asset_type.parse()?);
            details.apply(&mut input)?;
            let asset = db.add_asset(store.id, &input)?;
            saved(ctx.output, "asset", asset.id, &asset)
        }
        AssetCommand::List { store } => {
            let store = resolve_store(db, &store)?;
            let assets = db.list_assets(store.id)?;
            if !ctx.output.is_human() {
                return emit_json(&assets);
            }
            ui::header(Icons::TOOLBOX, &format!("Assets of {}", store.label()));
            print_rows(&ui::record_rows::<_, ui::AssetRow>(&assets), "No assets recorded");
            Ok(())
        }
        AssetCommand::Update { id, asset_type, details } => {
            let mut input = AssetInput::from(&db.get_asset(id)?);
            if let Some(asset_type) = asset_type {
                input.asset_type = asset_type.parse()?;
            }
            details.apply(&mut input)?;
            let asset = db.update_asset(id, &input)?;
            saved(ctx.output, "asset", asset.id, &asset)
        }
        AssetCommand::Delete { id } => {
            db.delete_asset(id)?;
            deleted(ctx.output, "asset", id)
        }
    }
}

// ========== history ==========

impl HistoryDetails {
    fn apply(self, input: &mut HistoryInput) -> anyhow::Result<()> {
        if let Some(date) = self.resolution_date {
            input.resolution_date = match date.trim() {
                "" => None,
                text => Some(parse_date("resolution_date", text)?.into()),
            };
        }
        set(&mut input.resolution, self.resolution);
        if let Some(status) = self.status {
            input.status = status.parse()?;
        }
        set(&mut input.technician, self.technician);
        Ok(())
    }
}

pub fn run_history(ctx: &Context, action: HistoryCommand) -> anyhow::Result<()> {
    let db = &ctx.db;
    match action {
        HistoryCommand::Add { store, ticket, description, date, details } => {
            let store = resolve_store(db, &store)?;
            let issue_date = match date {
                Some(text) => parse_date("issue_date", &text)?,
                None => chrono::Local::now().date_naive(),
            };
            let mut input = HistoryInput::new(ticket, issue_date, description);
            details.apply(&mut input)?;
            let entry = db.add_history(store.id, &input)?;
            saved(ctx.output, "history entry", entry.id, &entry)
        }
        HistoryCommand::List { store } => {
            let store = resolve_store(db, &store)?;
            let history = db.list_history(store.id)?;
            if !ctx.output.is_human() {
                return emit_json(&history);
            }
            ui::header(Icons::TICKET, &format!("History of {}", store.label()));
            print_rows(&ui::record_rows::<_, ui::HistoryRow>(&history), "No history recorded");
            Ok(())
        }
        HistoryCommand::Update { id, ticket, description, date, details } => {
            let mut input = HistoryInput::from(&db.get_history(id)?);
            if let Some(ticket) = ticket {
                input.ticket_code = ticket;
            }
            if let Some(text) = date {
                input.issue_date = parse_date("issue_date", &text)?.into();
            }
            if let Some(description) = description {
                input.issue_desc = description;
            }
            details.apply(&mut input)?;

            let entry = db.update_history(id, &input)?;
            saved(ctx.output, "history entry", entry.id, &entry)
        }
        HistoryCommand::Delete { id } => {
            db.delete_history(id)?;
            deleted(ctx.output, "history entry", id)
        }
    }
}

// ========== export ==========

pub fn run_export(ctx: &Context, store: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let store = resolve_store(&ctx.db, store)?;
    let path = output.unwrap_or_else(|| ctx.config.report_path(&report::default_file_name(&store)));
    config::ensure_parent_dir(&path)?;

    let summary = report::render_store_report(&ctx.db, store.id, &path)?;
    if !ctx.output.is_human() {
        return emit_json(&summary);
    }
    ui::success(&format!("Record sheet written for {}", store.label()));
    ui::info("File", &summary.path.display().to_string());
    ui::summary_row("Pages:", &summary.pages.to_string());
    ui::summary_row("Lines:", &summary.lines.to_string());
    Ok(())
}
