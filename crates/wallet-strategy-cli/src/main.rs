//! WalletStrategy CLI: `wst` command.
//!
//! Provides a command-line interface for managing signing policy:
//! templates, key-binds, groups, tokens, and request verification.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use wallet_strategy::config::CONFIG_FILE;
use wallet_strategy::crypto::token_fingerprint;
use wallet_strategy::time::format_micros;
use wallet_strategy::{
    Address, CodeRegistry, Group, KeyBind, MethodTemplate, MsgTypeTemplate, Page, StoreConfig,
    StrategyError, StrategyStore,
};

// ── Directory helpers ─────────────────────────────────────────────────────────

fn default_repo() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set; pass --repo")?;
    Ok(PathBuf::from(home).join(".wallet_strategy"))
}

fn open_store(repo: &Path) -> Result<StrategyStore> {
    log::debug!("using strategy repo {}", repo.display());
    StrategyStore::open_repo(repo)
        .with_context(|| format!("failed to open strategy store at {}", repo.display()))
}

// ── Argument parsing helpers ──────────────────────────────────────────────────

/// Parse a code given as a number (`5`) or a registry name (`market`).
fn parse_code(registry: &CodeRegistry, s: &str) -> Result<u32> {
    let s = s.trim();
    if let Ok(code) = s.parse::<u32>() {
        return Ok(code);
    }
    registry
        .code_by_name(s)
        .ok_or_else(|| anyhow!("unknown message type '{s}' (see `wst codes`)"))
}

fn parse_codes(registry: &CodeRegistry, items: &[String]) -> Result<Vec<u32>> {
    items.iter().map(|s| parse_code(registry, s)).collect()
}

fn parse_address(s: &str) -> Result<Address> {
    s.parse::<Address>()
        .with_context(|| format!("invalid address '{s}'"))
}

fn page(offset: usize, limit: Option<usize>) -> Page {
    Page { offset, limit }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe_codes(registry: &CodeRegistry, codes: impl IntoIterator<Item = u32>) -> String {
    codes
        .into_iter()
        .map(|c| registry.describe(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_methods<'a>(methods: impl IntoIterator<Item = &'a String>) -> String {
    let joined = methods
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// WalletStrategy CLI: manage which addresses, message types and methods a
/// token may sign for.
#[derive(Parser, Debug)]
#[command(
    name = "wst",
    about = "WalletStrategy CLI",
    version,
    long_about = "wst: WalletStrategy CLI\n\nManage message-type and method templates, key-binds, groups and tokens,\nand check signing requests against a token's group."
)]
struct Cli {
    /// Strategy repository directory (default: ~/.wallet_strategy)
    #[arg(long, global = true, env = "WALLET_STRATEGY_PATH")]
    repo: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the repository directory, config file and database
    Init,

    /// List known message-type codes and aggregates
    Codes,

    /// Manage message-type and method templates
    Template {
        #[command(subcommand)]
        subcommand: TemplateCommands,
    },

    /// Manage key-binds
    #[command(name = "keybind")]
    KeyBind {
        #[command(subcommand)]
        subcommand: KeyBindCommands,
    },

    /// Manage groups of key-binds
    Group {
        #[command(subcommand)]
        subcommand: GroupCommands,
    },

    /// Manage tokens
    Token {
        #[command(subcommand)]
        subcommand: TokenCommands,
    },

    /// Check a signing request against a token's group
    Verify {
        /// Token presented with the request
        token: String,

        /// Signing address
        address: String,

        /// Message type (number or name)
        code: String,

        /// Method name, for chain messages
        #[arg(long)]
        method: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCommands {
    /// Create a message-type template
    NewMsgType {
        name: String,

        /// Comma-separated codes or names (aggregates allowed)
        #[arg(long, value_delimiter = ',', required = true)]
        codes: Vec<String>,
    },

    /// Create a method template
    NewMethod {
        name: String,

        /// Comma-separated method names
        #[arg(long, value_delimiter = ',', required = true)]
        methods: Vec<String>,
    },

    /// Remove a message-type template
    RmMsgType { name: String },

    /// Remove a method template
    RmMethod { name: String },

    /// Show a template of either kind
    Show { name: String },

    /// List templates
    List {
        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
enum KeyBindCommands {
    /// Create a key-bind from explicit codes and methods
    New {
        name: String,
        address: String,

        /// Comma-separated codes or names
        #[arg(long, value_delimiter = ',', required = true)]
        codes: Vec<String>,

        /// Comma-separated method names
        #[arg(long, value_delimiter = ',')]
        methods: Vec<String>,
    },

    /// Create a key-bind by copying templates
    FromTemplate {
        name: String,
        address: String,

        /// Message-type template name
        #[arg(long)]
        msg_type: String,

        /// Method template name
        #[arg(long)]
        method: Option<String>,
    },

    /// Add codes to a key-bind
    AddCodes {
        name: String,
        #[arg(value_delimiter = ',', required = true)]
        codes: Vec<String>,
    },

    /// Remove codes from a key-bind
    RmCodes {
        name: String,
        #[arg(value_delimiter = ',', required = true)]
        codes: Vec<String>,
    },

    /// Add methods to a key-bind
    AddMethods {
        name: String,
        #[arg(value_delimiter = ',', required = true)]
        methods: Vec<String>,
    },

    /// Remove methods from a key-bind
    RmMethods {
        name: String,
        #[arg(value_delimiter = ',', required = true)]
        methods: Vec<String>,
    },

    /// Remove a key-bind by name, or every key-bind for --address
    Rm {
        #[arg(required_unless_present = "address", conflicts_with = "address")]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// Show a key-bind
    Show { name: String },

    /// List key-binds
    List {
        /// Only key-binds for this address
        #[arg(long)]
        address: Option<String>,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
enum GroupCommands {
    /// Create a group from existing key-binds
    New {
        name: String,

        /// Key-bind names
        #[arg(required = true)]
        key_binds: Vec<String>,
    },

    /// Remove a group and revoke its tokens
    Rm { name: String },

    /// Show a group
    Show { name: String },

    /// List groups
    List {
        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommands {
    /// Issue a token for a group
    New { group: String },

    /// Revoke a token
    Rm { token: String },

    /// Show the group a token grants
    Show { token: String },

    /// List tokens issued for a group
    List { group: String },
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let ctx = match cli.repo.clone().map(Ok).unwrap_or_else(default_repo) {
        Ok(repo) => Ctx {
            repo,
            json: cli.json,
            verbose: cli.verbose,
        },
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Init => cmd_init(&ctx),
        Commands::Codes => cmd_codes(&ctx),
        Commands::Template { subcommand } => match subcommand {
            TemplateCommands::NewMsgType { name, codes } => {
                cmd_template_new_msg_type(&ctx, &name, &codes)
            }
            TemplateCommands::NewMethod { name, methods } => {
                cmd_template_new_method(&ctx, &name, &methods)
            }
            TemplateCommands::RmMsgType { name } => cmd_template_rm(&ctx, &name, false),
            TemplateCommands::RmMethod { name } => cmd_template_rm(&ctx, &name, true),
            TemplateCommands::Show { name } => cmd_template_show(&ctx, &name),
            TemplateCommands::List { offset, limit } => {
                cmd_template_list(&ctx, page(offset, limit))
            }
        },
        Commands::KeyBind { subcommand } => match subcommand {
            KeyBindCommands::New {
                name,
                address,
                codes,
                methods,
            } => cmd_key_bind_new(&ctx, &name, &address, &codes, &methods),
            KeyBindCommands::FromTemplate {
                name,
                address,
                msg_type,
                method,
            } => cmd_key_bind_from_template(&ctx, &name, &address, &msg_type, method.as_deref()),
            KeyBindCommands::AddCodes { name, codes } => {
                cmd_key_bind_codes(&ctx, &name, &codes, true)
            }
            KeyBindCommands::RmCodes { name, codes } => {
                cmd_key_bind_codes(&ctx, &name, &codes, false)
            }
            KeyBindCommands::AddMethods { name, methods } => {
                cmd_key_bind_methods(&ctx, &name, &methods, true)
            }
            KeyBindCommands::RmMethods { name, methods } => {
                cmd_key_bind_methods(&ctx, &name, &methods, false)
            }
            KeyBindCommands::Rm { name, address } => {
                cmd_key_bind_rm(&ctx, name.as_deref(), address.as_deref())
            }
            KeyBindCommands::Show { name } => cmd_key_bind_show(&ctx, &name),
            KeyBindCommands::List {
                address,
                offset,
                limit,
            } => cmd_key_bind_list(&ctx, address.as_deref(), page(offset, limit)),
        },
        Commands::Group { subcommand } => match subcommand {
            GroupCommands::New { name, key_binds } => cmd_group_new(&ctx, &name, &key_binds),
            GroupCommands::Rm { name } => cmd_group_rm(&ctx, &name),
            GroupCommands::Show { name } => cmd_group_show(&ctx, &name),
            GroupCommands::List { offset, limit } => cmd_group_list(&ctx, page(offset, limit)),
        },
        Commands::Token { subcommand } => match subcommand {
            TokenCommands::New { group } => cmd_token_new(&ctx, &group),
            TokenCommands::Rm { token } => cmd_token_rm(&ctx, &token),
            TokenCommands::Show { token } => cmd_token_show(&ctx, &token),
            TokenCommands::List { group } => cmd_token_list(&ctx, &group),
        },
        Commands::Verify {
            token,
            address,
            code,
            method,
        } => cmd_verify(&ctx, &token, &address, &code, method.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Global options shared by every command.
struct Ctx {
    repo: PathBuf,
    json: bool,
    verbose: bool,
}

// ── Printing ──────────────────────────────────────────────────────────────────

fn print_msg_type_template(registry: &CodeRegistry, t: &MsgTypeTemplate, verbose: bool) {
    println!("Msg type template: {}", t.name);
    println!("  Codes:   {}", describe_codes(registry, t.codes.iter().copied()));
    if verbose {
        println!(
            "  Resolved: {}",
            describe_codes(registry, registry.resolve(t.codes.iter().copied()))
        );
        println!("  Created: {}", format_micros(t.created_at));
    }
}

fn print_method_template(t: &MethodTemplate, verbose: bool) {
    println!("Method template: {}", t.name);
    println!("  Methods: {}", join_methods(&t.methods));
    if verbose {
        println!("  Created: {}", format_micros(t.created_at));
    }
}

fn print_key_bind(registry: &CodeRegistry, kb: &KeyBind, indent: &str, verbose: bool) {
    println!("{indent}Key-bind: {}", kb.name);
    println!("{indent}  Address: {}", kb.address);
    println!("{indent}  Codes:   {}", describe_codes(registry, kb.codes.iter().copied()));
    println!("{indent}  Methods: {}", join_methods(&kb.methods));
    if verbose {
        println!("{indent}  Created: {}", format_micros(kb.created_at));
    }
}

fn print_group(registry: &CodeRegistry, group: &Group, verbose: bool) {
    println!("Group: {}", group.name);
    println!("  Key-binds: {}", group.key_bind_names().join(", "));
    if verbose {
        println!("  Created:   {}", format_micros(group.created_at));
        for kb in &group.key_binds {
            print_key_bind(registry, kb, "  ", verbose);
        }
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `wst init`
fn cmd_init(ctx: &Ctx) -> Result<()> {
    std::fs::create_dir_all(&ctx.repo)
        .with_context(|| format!("failed to create {}", ctx.repo.display()))?;

    let config_path = ctx.repo.join(CONFIG_FILE);
    if !config_path.exists() {
        StoreConfig::default()
            .save(&ctx.repo)
            .context("failed to write config")?;
    }
    let config = StoreConfig::load(&ctx.repo).context("failed to read config")?;
    open_store(&ctx.repo)?;

    println!("Initialized strategy repo at {}", ctx.repo.display());
    if ctx.verbose {
        println!("  Config:   {}", config_path.display());
        println!("  Database: {}", config.db_path(&ctx.repo).display());
    }
    Ok(())
}

/// `wst codes`
fn cmd_codes(ctx: &Ctx) -> Result<()> {
    let registry = CodeRegistry::default();
    if ctx.json {
        let entries: Vec<_> = registry
            .entries()
            .map(|(code, name)| {
                serde_json::json!({
                    "code": code,
                    "name": name,
                    "members": registry.members(code),
                })
            })
            .collect();
        return print_json(&entries);
    }

    for (code, name) in registry.entries() {
        match registry.members(code) {
            Some(members) => println!(
                "{code:>5}  {name:<20} -> {}",
                describe_codes(&registry, members.iter().copied())
            ),
            None => println!("{code:>5}  {name}"),
        }
    }
    Ok(())
}

/// `wst template new-msg-type NAME --codes ..`
fn cmd_template_new_msg_type(ctx: &Ctx, name: &str, codes: &[String]) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let codes = parse_codes(store.registry(), codes)?;
    let template = store
        .create_msg_type_template(name, &codes)
        .context("failed to create msg type template")?;

    if ctx.json {
        return print_json(&template);
    }
    println!("Created msg type template '{name}'");
    print_msg_type_template(store.registry(), &template, ctx.verbose);
    Ok(())
}

/// `wst template new-method NAME --methods ..`
fn cmd_template_new_method(ctx: &Ctx, name: &str, methods: &[String]) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let template = store
        .create_method_template(name, methods)
        .context("failed to create method template")?;

    if ctx.json {
        return print_json(&template);
    }
    println!("Created method template '{name}'");
    print_method_template(&template, ctx.verbose);
    Ok(())
}

/// `wst template rm-msg-type NAME` / `wst template rm-method NAME`
fn cmd_template_rm(ctx: &Ctx, name: &str, method: bool) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    if method {
        store
            .remove_method_template(name)
            .context("failed to remove method template")?;
        println!("Removed method template '{name}'");
    } else {
        store
            .remove_msg_type_template(name)
            .context("failed to remove msg type template")?;
        println!("Removed msg type template '{name}'");
    }
    Ok(())
}

/// `wst template show NAME`
fn cmd_template_show(ctx: &Ctx, name: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let msg_type = found(store.get_msg_type_template(name))
        .with_context(|| format!("failed to load msg type template '{name}'"))?;
    let method = found(store.get_method_template(name))
        .with_context(|| format!("failed to load method template '{name}'"))?;

    if msg_type.is_none() && method.is_none() {
        return Err(anyhow!("no template named '{name}'"));
    }
    if ctx.json {
        return print_json(&serde_json::json!({
            "msg_type": msg_type,
            "method": method,
        }));
    }
    if let Some(t) = &msg_type {
        print_msg_type_template(store.registry(), t, ctx.verbose);
    }
    if let Some(t) = &method {
        print_method_template(t, ctx.verbose);
    }
    Ok(())
}

/// Map `NotFound` to `None`; every other error is kept.
fn found<T>(result: wallet_strategy::Result<T>) -> wallet_strategy::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StrategyError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// `wst template list`
fn cmd_template_list(ctx: &Ctx, page: Page) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let msg_types = store
        .list_msg_type_templates(page)
        .context("failed to list msg type templates")?;
    let methods = store
        .list_method_templates(page)
        .context("failed to list method templates")?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "msg_type": msg_types,
            "method": methods,
        }));
    }
    if msg_types.is_empty() && methods.is_empty() {
        println!("No templates.");
        return Ok(());
    }
    for t in &msg_types {
        print_msg_type_template(store.registry(), t, ctx.verbose);
    }
    for t in &methods {
        print_method_template(t, ctx.verbose);
    }
    Ok(())
}

/// `wst keybind new NAME ADDRESS --codes .. [--methods ..]`
fn cmd_key_bind_new(
    ctx: &Ctx,
    name: &str,
    address: &str,
    codes: &[String],
    methods: &[String],
) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let address = parse_address(address)?;
    let codes = parse_codes(store.registry(), codes)?;
    let kb = store
        .create_key_bind(name, &address, &codes, methods)
        .context("failed to create key-bind")?;

    if ctx.json {
        return print_json(&kb);
    }
    println!("Created key-bind '{name}'");
    print_key_bind(store.registry(), &kb, "", ctx.verbose);
    Ok(())
}

/// `wst keybind from-template NAME ADDRESS --msg-type T [--method M]`
fn cmd_key_bind_from_template(
    ctx: &Ctx,
    name: &str,
    address: &str,
    msg_type: &str,
    method: Option<&str>,
) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let address = parse_address(address)?;
    let kb = store
        .create_key_bind_from_template(name, &address, msg_type, method)
        .context("failed to create key-bind from template")?;

    if ctx.json {
        return print_json(&kb);
    }
    println!("Created key-bind '{name}' from template '{msg_type}'");
    print_key_bind(store.registry(), &kb, "", ctx.verbose);
    Ok(())
}

/// `wst keybind add-codes|rm-codes NAME CODES`
fn cmd_key_bind_codes(ctx: &Ctx, name: &str, codes: &[String], add: bool) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let codes = parse_codes(store.registry(), codes)?;
    let kb = if add {
        store.add_codes(name, &codes)
    } else {
        store.remove_codes(name, &codes)
    }
    .with_context(|| format!("failed to update codes of key-bind '{name}'"))?;

    if ctx.json {
        return print_json(&kb);
    }
    print_key_bind(store.registry(), &kb, "", ctx.verbose);
    Ok(())
}

/// `wst keybind add-methods|rm-methods NAME METHODS`
fn cmd_key_bind_methods(ctx: &Ctx, name: &str, methods: &[String], add: bool) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let kb = if add {
        store.add_methods(name, methods)
    } else {
        store.remove_methods(name, methods)
    }
    .with_context(|| format!("failed to update methods of key-bind '{name}'"))?;

    if ctx.json {
        return print_json(&kb);
    }
    print_key_bind(store.registry(), &kb, "", ctx.verbose);
    Ok(())
}

/// `wst keybind rm NAME` / `wst keybind rm --address ADDR`
fn cmd_key_bind_rm(ctx: &Ctx, name: Option<&str>, address: Option<&str>) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    match (name, address) {
        (Some(name), _) => {
            store
                .remove_key_bind(name)
                .context("failed to remove key-bind")?;
            println!("Removed key-bind '{name}'");
        }
        (None, Some(address)) => {
            let address = parse_address(address)?;
            let removed = store
                .remove_key_binds_by_address(&address)
                .context("failed to remove key-binds")?;
            println!("Removed {removed} key-bind(s) for {address}");
        }
        (None, None) => return Err(anyhow!("give a key-bind name or --address")),
    }
    Ok(())
}

/// `wst keybind show NAME`
fn cmd_key_bind_show(ctx: &Ctx, name: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let kb = store.get_key_bind(name).context("failed to load key-bind")?;
    if ctx.json {
        return print_json(&kb);
    }
    print_key_bind(store.registry(), &kb, "", true);
    Ok(())
}

/// `wst keybind list [--address ADDR]`
fn cmd_key_bind_list(ctx: &Ctx, address: Option<&str>, page: Page) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let key_binds = match address {
        Some(a) => store.get_key_binds_by_address(&parse_address(a)?),
        None => store.list_key_binds(page),
    }
    .context("failed to list key-binds")?;

    if ctx.json {
        return print_json(&key_binds);
    }
    if key_binds.is_empty() {
        println!("No key-binds.");
    }
    for kb in &key_binds {
        print_key_bind(store.registry(), kb, "", ctx.verbose);
    }
    Ok(())
}

/// `wst group new NAME KEYBIND...`
fn cmd_group_new(ctx: &Ctx, name: &str, key_binds: &[String]) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let group = store
        .create_group(name, key_binds)
        .context("failed to create group")?;

    if ctx.json {
        return print_json(&group);
    }
    println!("Created group '{name}'");
    print_group(store.registry(), &group, ctx.verbose);
    Ok(())
}

/// `wst group rm NAME`
fn cmd_group_rm(ctx: &Ctx, name: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let revoked = store.remove_group(name).context("failed to remove group")?;
    println!("Removed group '{name}' ({revoked} token(s) revoked)");
    Ok(())
}

/// `wst group show NAME`
fn cmd_group_show(ctx: &Ctx, name: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let group = store.get_group(name).context("failed to load group")?;
    if ctx.json {
        return print_json(&group);
    }
    print_group(store.registry(), &group, true);
    Ok(())
}

/// `wst group list`
fn cmd_group_list(ctx: &Ctx, page: Page) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let groups = store.list_groups(page).context("failed to list groups")?;
    if ctx.json {
        return print_json(&groups);
    }
    if groups.is_empty() {
        println!("No groups.");
    }
    for group in &groups {
        print_group(store.registry(), group, ctx.verbose);
    }
    Ok(())
}

/// `wst token new GROUP`
fn cmd_token_new(ctx: &Ctx, group: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let token = store.create_token(group).context("failed to create token")?;
    if ctx.json {
        return print_json(&serde_json::json!({ "token": token, "group": group }));
    }
    // Bare token on stdout so it can be captured by scripts.
    println!("{token}");
    if ctx.verbose {
        eprintln!("Issued token {} for group '{group}'", token_fingerprint(&token));
    }
    Ok(())
}

/// `wst token rm TOKEN`
fn cmd_token_rm(ctx: &Ctx, token: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    store.remove_token(token).context("failed to remove token")?;
    println!("Removed token {}", token_fingerprint(token));
    Ok(())
}

/// `wst token show TOKEN`
fn cmd_token_show(ctx: &Ctx, token: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let info = store.get_token(token).context("failed to load token")?;
    let group = store.group_by_token(token).context("failed to load group")?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "fingerprint": info.fingerprint(),
            "created_at": info.created_at,
            "group": group,
        }));
    }
    println!("Token: {}", info.fingerprint());
    println!("  Created: {}", format_micros(info.created_at));
    print_group(store.registry(), &group, ctx.verbose);
    Ok(())
}

/// `wst token list GROUP`
fn cmd_token_list(ctx: &Ctx, group: &str) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let tokens = store
        .list_tokens_by_group(group)
        .context("failed to list tokens")?;

    if ctx.json {
        let entries: Vec<_> = tokens
            .iter()
            .map(|t| serde_json::json!({ "fingerprint": t.fingerprint(), "created_at": t.created_at }))
            .collect();
        return print_json(&entries);
    }
    if tokens.is_empty() {
        println!("No tokens for group '{group}'.");
    }
    for t in &tokens {
        println!("{}  {}", t.fingerprint(), format_micros(t.created_at));
    }
    Ok(())
}

/// `wst verify TOKEN ADDRESS CODE [--method M]`
fn cmd_verify(
    ctx: &Ctx,
    token: &str,
    address: &str,
    code: &str,
    method: Option<&str>,
) -> Result<()> {
    let store = open_store(&ctx.repo)?;
    let address = parse_address(address)?;
    let code = parse_code(store.registry(), code)?;
    let v = store
        .verify(token, &address, code, method)
        .context("failed to verify request")?;

    if ctx.json {
        print_json(&serde_json::json!({
            "group": v.group,
            "address_bound": v.address_bound,
            "code_allowed": v.code_allowed,
            "matched_key_bind": v.matched_key_bind,
            "is_permitted": v.is_permitted,
            "denial_reason": v.denial_reason(),
        }))?;
    } else {
        println!("Group:     {}", v.group);
        println!("  Address bound: {}", v.address_bound);
        println!("  Code allowed:  {}", v.code_allowed);
        if let Some(kb) = &v.matched_key_bind {
            println!("  Matched:       {kb}");
        }
        println!("  Permitted:     {}", v.is_permitted);
    }

    match v.denial_reason() {
        None => Ok(()),
        Some(reason) => Err(anyhow!(
            "denied: {reason} ({address}, {})",
            store.registry().describe(code)
        )),
    }
}
