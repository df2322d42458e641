//! `StrategyStore`: the single persistence-backed gateway.
//!
//! Every public operation takes the connection lock, runs inside one SQLite
//! transaction and commits at the end. An error anywhere drops the
//! transaction, which rolls it back, so a failed call leaves the database as
//! it was. Copies between entities (template into key-bind, key-binds into a
//! group) happen inside that one transaction.

use std::path::Path;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, InterruptHandle, Transaction, TransactionBehavior};

use crate::address::Address;
use crate::code::CodeRegistry;
use crate::config::StoreConfig;
use crate::crypto::{generate_token, token_fingerprint};
use crate::error::{Result, StrategyError};
use crate::policy::validate::{method_set, require_codes, require_name, require_resolved};
use crate::policy::{
    verify_group_policy, Group, KeyBind, MethodTemplate, MsgTypeTemplate, PolicyVerification,
    TokenInfo,
};
use crate::set::OrderedSet;
use crate::time::now_micros;

use super::{group_store, key_bind_store, schema, template_store, token_store, Page};

/// Transactional store for the whole policy model.
///
/// `StrategyStore` is `Send + Sync`; share it between request handlers with
/// an `Arc`. Operations are linearizable: they serialize on one connection.
pub struct StrategyStore {
    conn: Mutex<Connection>,
    interrupt: InterruptHandle,
    registry: CodeRegistry,
    lock_timeout: Duration,
}

impl StrategyStore {
    // ── Opening ───────────────────────────────────────────────────────────────

    /// Open (or create) the store described by `config` inside `repo_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::StorageFailure` if the directory or database
    /// cannot be opened or the schema cannot be created.
    pub fn open(repo_dir: &Path, config: &StoreConfig) -> Result<Self> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            std::fs::create_dir_all(repo_dir)?;
            let path = config.db_path(repo_dir);
            log::info!("opening strategy store at {}", path.display());
            let conn = Connection::open(&path)?;
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
            conn
        };
        conn.busy_timeout(config.busy_timeout())?;
        Self::from_connection(conn, config.lock_timeout())
    }

    /// Open the store for a repo directory, reading `config.json` if present.
    pub fn open_repo(repo_dir: &Path) -> Result<Self> {
        let config = StoreConfig::load(repo_dir)?;
        Self::open(repo_dir, &config)
    }

    /// Open a fresh in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        log::debug!("opening in-memory strategy store");
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, StoreConfig::default().lock_timeout())
    }

    fn from_connection(conn: Connection, lock_timeout: Duration) -> Result<Self> {
        schema::init_schema(&conn)?;
        let interrupt = conn.get_interrupt_handle();
        Ok(Self {
            conn: Mutex::new(conn),
            interrupt,
            registry: CodeRegistry::default(),
            lock_timeout,
        })
    }

    /// Replace the code registry used to resolve aggregate codes.
    pub fn with_registry(mut self, registry: CodeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    /// Abort the statement currently running on the store's connection.
    ///
    /// The interrupted operation fails with `StorageFailure` and its
    /// transaction rolls back. Safe to call from any thread.
    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    // ── Message-type templates ────────────────────────────────────────────────

    /// Create a named message-type template.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name or empty code list,
    /// `AlreadyExists` if the name is taken.
    pub fn create_msg_type_template(&self, name: &str, codes: &[u32]) -> Result<MsgTypeTemplate> {
        require_name("msg type template", name)?;
        let codes = require_codes("msg type template", codes)?;
        let template = MsgTypeTemplate {
            name: name.to_string(),
            codes,
            created_at: now_micros(),
        };

        self.write(|tx| {
            if template_store::msg_type_template_exists(tx, name)? {
                return Err(StrategyError::AlreadyExists(format!(
                    "msg type template '{name}'"
                )));
            }
            template_store::insert_msg_type_template(tx, &template)
        })?;

        log::debug!("created msg type template '{name}' ({} codes)", template.codes.len());
        Ok(template)
    }

    /// Remove a message-type template. Key-binds built from it are untouched.
    pub fn remove_msg_type_template(&self, name: &str) -> Result<()> {
        self.write(|tx| {
            if !template_store::delete_msg_type_template(tx, name)? {
                return Err(StrategyError::NotFound(format!("msg type template '{name}'")));
            }
            Ok(())
        })?;
        log::debug!("removed msg type template '{name}'");
        Ok(())
    }

    pub fn get_msg_type_template(&self, name: &str) -> Result<MsgTypeTemplate> {
        self.read(|tx| template_store::get_msg_type_template(tx, name))?
            .ok_or_else(|| StrategyError::NotFound(format!("msg type template '{name}'")))
    }

    pub fn list_msg_type_templates(&self, page: Page) -> Result<Vec<MsgTypeTemplate>> {
        self.read(|tx| template_store::list_msg_type_templates(tx, page))
    }

    // ── Method templates ──────────────────────────────────────────────────────

    /// Create a named method template.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name, an empty list or a blank method,
    /// `AlreadyExists` if the name is taken.
    pub fn create_method_template<S: AsRef<str>>(
        &self,
        name: &str,
        methods: &[S],
    ) -> Result<MethodTemplate> {
        require_name("method template", name)?;
        let methods = method_set("method template", methods, false)?;
        let template = MethodTemplate {
            name: name.to_string(),
            methods,
            created_at: now_micros(),
        };

        self.write(|tx| {
            if template_store::method_template_exists(tx, name)? {
                return Err(StrategyError::AlreadyExists(format!(
                    "method template '{name}'"
                )));
            }
            template_store::insert_method_template(tx, &template)
        })?;

        log::debug!("created method template '{name}' ({} methods)", template.methods.len());
        Ok(template)
    }

    /// Remove a method template. Key-binds built from it are untouched.
    pub fn remove_method_template(&self, name: &str) -> Result<()> {
        self.write(|tx| {
            if !template_store::delete_method_template(tx, name)? {
                return Err(StrategyError::NotFound(format!("method template '{name}'")));
            }
            Ok(())
        })?;
        log::debug!("removed method template '{name}'");
        Ok(())
    }

    pub fn get_method_template(&self, name: &str) -> Result<MethodTemplate> {
        self.read(|tx| template_store::get_method_template(tx, name))?
            .ok_or_else(|| StrategyError::NotFound(format!("method template '{name}'")))
    }

    pub fn list_method_templates(&self, page: Page) -> Result<Vec<MethodTemplate>> {
        self.read(|tx| template_store::list_method_templates(tx, page))
    }

    // ── Key-binds ─────────────────────────────────────────────────────────────

    /// Create a key-bind from explicit code and method lists.
    ///
    /// Codes are resolved before they are stored. `methods` may be empty, in
    /// which case the key-bind denies every method-bearing request.
    pub fn create_key_bind<S: AsRef<str>>(
        &self,
        name: &str,
        address: &Address,
        codes: &[u32],
        methods: &[S],
    ) -> Result<KeyBind> {
        require_name("key-bind", name)?;
        let codes = require_codes("key-bind", codes)?;
        let codes = require_resolved("key-bind", self.registry.resolve(codes))?;
        let methods = method_set("key-bind", methods, true)?;
        let kb = KeyBind {
            name: name.to_string(),
            address: address.clone(),
            codes,
            methods,
            created_at: now_micros(),
        };

        self.write(|tx| {
            ensure_key_bind_free(tx, name)?;
            key_bind_store::insert_key_bind(tx, &kb)
        })?;

        log::debug!("created key-bind '{name}' for {address}");
        Ok(kb)
    }

    /// Create a key-bind by copying the current contents of templates.
    ///
    /// The message-type template's codes are resolved and copied; the method
    /// template's methods are copied when given, otherwise methods start
    /// empty. Later template changes never reach the key-bind.
    ///
    /// # Errors
    ///
    /// `NotFound` if a named template does not exist, `AlreadyExists` if the
    /// key-bind name is taken.
    pub fn create_key_bind_from_template(
        &self,
        name: &str,
        address: &Address,
        msg_type_template: &str,
        method_template: Option<&str>,
    ) -> Result<KeyBind> {
        require_name("key-bind", name)?;

        let kb = self.write(|tx| {
            ensure_key_bind_free(tx, name)?;

            let mtt = template_store::get_msg_type_template(tx, msg_type_template)?
                .ok_or_else(|| {
                    StrategyError::NotFound(format!("msg type template '{msg_type_template}'"))
                })?;
            let methods = match method_template {
                Some(mt_name) => {
                    template_store::get_method_template(tx, mt_name)?
                        .ok_or_else(|| {
                            StrategyError::NotFound(format!("method template '{mt_name}'"))
                        })?
                        .methods
                }
                None => OrderedSet::new(),
            };

            let codes = require_resolved(
                "key-bind",
                self.registry.resolve(mtt.codes.iter().copied()),
            )?;
            let kb = KeyBind {
                name: name.to_string(),
                address: address.clone(),
                codes,
                methods,
                created_at: now_micros(),
            };
            key_bind_store::insert_key_bind(tx, &kb)?;
            Ok(kb)
        })?;

        log::debug!(
            "created key-bind '{name}' for {address} from template '{msg_type_template}'"
        );
        Ok(kb)
    }

    /// Add codes to a key-bind. Input codes are resolved first.
    pub fn add_codes(&self, name: &str, codes: &[u32]) -> Result<KeyBind> {
        let codes = self.registry.resolve(require_codes("add codes", codes)?);
        self.modify_key_bind(name, |kb| {
            kb.add_codes(&codes);
        })
    }

    /// Remove codes from a key-bind. Input codes are resolved first; codes
    /// the key-bind does not hold are ignored.
    pub fn remove_codes(&self, name: &str, codes: &[u32]) -> Result<KeyBind> {
        let codes = self.registry.resolve(require_codes("remove codes", codes)?);
        self.modify_key_bind(name, |kb| {
            kb.remove_codes(&codes);
        })
    }

    pub fn add_methods<S: AsRef<str>>(&self, name: &str, methods: &[S]) -> Result<KeyBind> {
        let methods = method_set("add methods", methods, false)?;
        self.modify_key_bind(name, |kb| {
            kb.add_methods(&methods);
        })
    }

    pub fn remove_methods<S: AsRef<str>>(&self, name: &str, methods: &[S]) -> Result<KeyBind> {
        let methods = method_set("remove methods", methods, false)?;
        self.modify_key_bind(name, |kb| {
            kb.remove_methods(&methods);
        })
    }

    /// Remove a key-bind by name. Groups holding a snapshot are untouched.
    pub fn remove_key_bind(&self, name: &str) -> Result<()> {
        self.write(|tx| {
            if !key_bind_store::delete_key_bind(tx, name)? {
                return Err(StrategyError::NotFound(format!("key-bind '{name}'")));
            }
            Ok(())
        })?;
        log::debug!("removed key-bind '{name}'");
        Ok(())
    }

    /// Remove every key-bind for an address. Returns how many were removed;
    /// zero is not an error.
    pub fn remove_key_binds_by_address(&self, address: &Address) -> Result<usize> {
        let removed = self.write(|tx| key_bind_store::delete_key_binds_by_address(tx, address))?;
        log::debug!("removed {removed} key-binds for {address}");
        Ok(removed)
    }

    pub fn get_key_bind(&self, name: &str) -> Result<KeyBind> {
        self.read(|tx| key_bind_store::get_key_bind(tx, name))?
            .ok_or_else(|| StrategyError::NotFound(format!("key-bind '{name}'")))
    }

    pub fn get_key_binds_by_address(&self, address: &Address) -> Result<Vec<KeyBind>> {
        self.read(|tx| key_bind_store::get_key_binds_by_address(tx, address))
    }

    pub fn list_key_binds(&self, page: Page) -> Result<Vec<KeyBind>> {
        self.read(|tx| key_bind_store::list_key_binds(tx, page))
    }

    /// Load, edit and write back one key-bind inside one transaction.
    fn modify_key_bind<F>(&self, name: &str, edit: F) -> Result<KeyBind>
    where
        F: FnOnce(&mut KeyBind),
    {
        let kb = self.write(|tx| {
            let mut kb = key_bind_store::get_key_bind(tx, name)?
                .ok_or_else(|| StrategyError::NotFound(format!("key-bind '{name}'")))?;
            edit(&mut kb);
            key_bind_store::update_key_bind_sets(tx, &kb)?;
            Ok(kb)
        })?;
        log::debug!(
            "updated key-bind '{name}': {} codes, {} methods",
            kb.codes.len(),
            kb.methods.len()
        );
        Ok(kb)
    }

    // ── Groups ────────────────────────────────────────────────────────────────

    /// Create a group from key-binds, snapshotting each one as it is now.
    ///
    /// Duplicate names in `key_bind_names` are collapsed.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name or empty list, `AlreadyExists` if
    /// the group name is taken, `NotFound` naming the first missing key-bind.
    pub fn create_group<S: AsRef<str>>(&self, name: &str, key_bind_names: &[S]) -> Result<Group> {
        require_name("group", name)?;
        let names: OrderedSet<&str> = key_bind_names.iter().map(|n| n.as_ref()).collect();
        if names.is_empty() {
            return Err(StrategyError::InvalidArgument(format!(
                "group '{name}' requires at least one key-bind"
            )));
        }

        let group = self.write(|tx| {
            if group_store::group_exists(tx, name)? {
                return Err(StrategyError::AlreadyExists(format!("group '{name}'")));
            }
            let mut key_binds = Vec::with_capacity(names.len());
            for kb_name in &names {
                let kb = key_bind_store::get_key_bind(tx, kb_name)?
                    .ok_or_else(|| StrategyError::NotFound(format!("key-bind '{kb_name}'")))?;
                key_binds.push(kb);
            }
            let group = Group {
                name: name.to_string(),
                key_binds,
                created_at: now_micros(),
            };
            group_store::insert_group(tx, &group)?;
            Ok(group)
        })?;

        log::debug!("created group '{name}' with {} key-binds", group.key_binds.len());
        Ok(group)
    }

    /// Remove a group and revoke every token bound to it, in one transaction.
    /// Key-binds are untouched. Returns the number of tokens revoked.
    pub fn remove_group(&self, name: &str) -> Result<usize> {
        let revoked = self.write(|tx| {
            if !group_store::delete_group(tx, name)? {
                return Err(StrategyError::NotFound(format!("group '{name}'")));
            }
            token_store::delete_tokens_by_group(tx, name)
        })?;
        log::debug!("removed group '{name}', revoked {revoked} tokens");
        Ok(revoked)
    }

    pub fn get_group(&self, name: &str) -> Result<Group> {
        self.read(|tx| group_store::get_group(tx, name))?
            .ok_or_else(|| StrategyError::NotFound(format!("group '{name}'")))
    }

    pub fn list_groups(&self, page: Page) -> Result<Vec<Group>> {
        self.read(|tx| group_store::list_groups(tx, page))
    }

    // ── Tokens ────────────────────────────────────────────────────────────────

    /// Issue a new token for an existing group.
    pub fn create_token(&self, group_name: &str) -> Result<String> {
        let info = TokenInfo {
            token: generate_token(),
            group_name: group_name.to_string(),
            created_at: now_micros(),
        };

        self.write(|tx| {
            if !group_store::group_exists(tx, group_name)? {
                return Err(StrategyError::NotFound(format!("group '{group_name}'")));
            }
            token_store::insert_token(tx, &info)
        })?;

        log::debug!("issued token {} for group '{group_name}'", info.fingerprint());
        Ok(info.token)
    }

    /// Revoke a token. Removing an unknown (or already removed) token is
    /// `NotFound`.
    pub fn remove_token(&self, token: &str) -> Result<()> {
        self.write(|tx| {
            if !token_store::delete_token(tx, token)? {
                return Err(StrategyError::NotFound(format!(
                    "token {}",
                    token_fingerprint(token)
                )));
            }
            Ok(())
        })?;
        log::debug!("removed token {}", token_fingerprint(token));
        Ok(())
    }

    pub fn get_token(&self, token: &str) -> Result<TokenInfo> {
        self.read(|tx| token_store::get_token(tx, token))?
            .ok_or_else(|| StrategyError::NotFound(format!("token {}", token_fingerprint(token))))
    }

    /// Tokens bound to a group. `NotFound` if the group does not exist.
    pub fn list_tokens_by_group(&self, group_name: &str) -> Result<Vec<TokenInfo>> {
        self.read(|tx| {
            if !group_store::group_exists(tx, group_name)? {
                return Err(StrategyError::NotFound(format!("group '{group_name}'")));
            }
            token_store::list_tokens_by_group(tx, group_name)
        })
    }

    /// Resolve a token to its group snapshot.
    pub fn group_by_token(&self, token: &str) -> Result<Group> {
        self.read(|tx| {
            let info = token_store::get_token(tx, token)?.ok_or_else(|| {
                StrategyError::NotFound(format!("token {}", token_fingerprint(token)))
            })?;
            group_store::get_group(tx, &info.group_name)?.ok_or_else(|| {
                StrategyError::NotFound(format!("group '{}'", info.group_name))
            })
        })
    }

    // ── Verification ──────────────────────────────────────────────────────────

    /// Check a signing request presented with `token`.
    ///
    /// Returns the verification result whether or not it permits the
    /// request; fails only if the token or its group cannot be found.
    pub fn verify(
        &self,
        token: &str,
        address: &Address,
        code: u32,
        method: Option<&str>,
    ) -> Result<PolicyVerification> {
        let group = self.group_by_token(token)?;
        Ok(verify_group_policy(&group, address, code, method))
    }

    /// Like [`verify`](Self::verify), but a denied request is
    /// `PermissionDenied`.
    pub fn authorize(
        &self,
        token: &str,
        address: &Address,
        code: u32,
        method: Option<&str>,
    ) -> Result<()> {
        let verification = self.verify(token, address, code, method)?;
        match verification.denial_reason() {
            None => Ok(()),
            Some(reason) => {
                log::warn!(
                    "denied code {code} for {address} in group '{}': {reason}",
                    verification.group
                );
                Err(StrategyError::PermissionDenied(format!(
                    "{reason}: address {address}, code {}",
                    self.registry.describe(code)
                )))
            }
        }
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.try_lock_for(self.lock_timeout).ok_or_else(|| {
            StrategyError::StorageFailure(format!(
                "timed out after {:?} waiting for the strategy store",
                self.lock_timeout
            ))
        })
    }

    fn transact<T, F>(&self, behavior: TransactionBehavior, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(behavior)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.transact(TransactionBehavior::Immediate, f)
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.transact(TransactionBehavior::Deferred, f)
    }
}

fn ensure_key_bind_free(conn: &Connection, name: &str) -> Result<()> {
    if key_bind_store::key_bind_exists(conn, name)? {
        return Err(StrategyError::AlreadyExists(format!("key-bind '{name}'")));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
