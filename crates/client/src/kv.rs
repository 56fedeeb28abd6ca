//! KV operation engine
//!
//! Implements `get`, `put`, and `delete` against the store's HTTP surface,
//! including the blocking long-poll read.
//!
//! ## The get protocol
//!
//! When reading a key there are two possibilities: the key does not (yet)
//! exist, or it exists - and if it exists there is no way to tell whether
//! the current value is its first. The caller picks a policy for each case,
//! and the combination fixes the behavior (X: reject, R: return, W: wait):
//!
//! - X X - meaningless; never returns a value
//! - X R - "normal" non-blocking get. The default
//! - X W - get the next value only (must have a current value)
//! - R X - meaningless; never returns a meaningful value
//! - R R - "safe" non-blocking, non-failing get-or-default
//! - R W - get the next value, or a default if the key never existed
//! - W X - get the first value only (must not have a current value)
//! - W R - get the first or current value; block only when necessary
//! - W W - get the first or next value; always wait for an update
//!
//! A wait is one long-lived request carrying the change index observed on
//! the peek read, bounded by the configured ceiling. The engine holds no
//! state across calls; concurrent callers are fully independent.

use crate::config::Config;
use crate::transport::{Response, Transport, TransportError};
use emissary_core::{
    build_tree, encode, normalize, DecodedEntry, Error, KvEntry, KvPair, Result, Value,
};

/// Behavior when the key does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundPolicy {
    /// Fail with `KeyNotFound`
    #[default]
    Reject,
    /// Return an empty-string value without blocking
    ReturnDefault,
    /// Block until the key's first value appears
    Wait,
}

/// Behavior when the key exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoundPolicy {
    /// Fail with `KeyAlreadyExists`
    Reject,
    /// Return the current value without blocking
    #[default]
    ReturnCurrent,
    /// Block until the key's next value appears
    Wait,
}

/// Caller-supplied mapping applied to each decoded value before return.
pub type Transformation = Box<dyn Fn(Value) -> Value>;

/// Read options.
///
/// `separator` only applies combined with `keys`. `transformation` runs on
/// every non-null decoded value.
#[derive(Default)]
pub struct GetOptions {
    /// List all keys under the prefix
    pub recurse: bool,
    /// Read consistency level, passed through to the store unopinionated
    pub consistency: Option<String>,
    /// Target datacenter, overriding the configured default
    pub dc: Option<String>,
    /// Return key names only, suppressing value decode
    pub keys: bool,
    /// List one level deep using this delimiter (requires `keys`)
    pub separator: Option<String>,
    /// Return only the change index of a single-entry result
    pub modify_index: bool,
    /// Return fully decoded entries with their store metadata
    pub decode_values: bool,
    /// Fold the result through the tree reconstructor
    pub convert_to_hash: bool,
    /// Keep entries whose decoded value is null in multi-entry results
    pub nil_values: bool,
    /// Mapping applied to each decoded value
    pub transformation: Option<Transformation>,
}

impl GetOptions {
    /// List all keys under the prefix.
    pub fn recurse(mut self) -> Self {
        self.recurse = true;
        self
    }

    /// Pass a consistency level through to the store.
    pub fn with_consistency(mut self, consistency: impl Into<String>) -> Self {
        self.consistency = Some(consistency.into());
        self
    }

    /// Target a datacenter for this read.
    pub fn with_dc(mut self, dc: impl Into<String>) -> Self {
        self.dc = Some(dc.into());
        self
    }

    /// Return key names only.
    pub fn keys(mut self) -> Self {
        self.keys = true;
        self
    }

    /// List one level deep using this delimiter (with `keys`).
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Return only the change index.
    pub fn modify_index(mut self) -> Self {
        self.modify_index = true;
        self
    }

    /// Return decoded entries with store metadata.
    pub fn decode_values(mut self) -> Self {
        self.decode_values = true;
        self
    }

    /// Fold the result into a nested tree.
    pub fn convert_to_hash(mut self) -> Self {
        self.convert_to_hash = true;
        self
    }

    /// Keep null-valued entries in multi-entry results.
    pub fn nil_values(mut self) -> Self {
        self.nil_values = true;
        self
    }

    /// Apply a mapping to each decoded value before return.
    pub fn with_transformation(mut self, f: impl Fn(Value) -> Value + 'static) -> Self {
        self.transformation = Some(Box::new(f));
        self
    }
}

/// Write options.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    /// Compare-and-swap: write only if the key's change index still matches
    pub cas: Option<u64>,
    /// Target datacenter, overriding the configured default
    pub dc: Option<String>,
}

/// Delete options.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Delete the entire prefix
    pub recurse: bool,
    /// Target datacenter, overriding the configured default
    pub dc: Option<String>,
}

/// Result of a read, shaped by the options that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum GetResult {
    /// Single-entry scalar (after optional transformation)
    Value(Value),
    /// Multi-entry read: ordered `(key, value)` pairs
    Pairs(Vec<KvPair>),
    /// `keys` listing
    Keys(Vec<String>),
    /// `modify_index`: the change index of the first entry
    Index(u64),
    /// `decode_values`: entries with metadata and decoded values
    Entries(Vec<DecodedEntry>),
    /// `convert_to_hash`: the reconstructed tree
    Tree(Value),
}

/// The KV client: one store, one injected transport.
pub struct Kv<T: Transport> {
    transport: T,
    config: Config,
}

impl<T: Transport> Kv<T> {
    /// Client over the given transport and configuration.
    pub fn new(transport: T, config: Config) -> Self {
        Kv { transport, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convenience non-blocking read of a single key's value.
    ///
    /// Equivalent to `get` with default options, Reject on absent and
    /// ReturnCurrent on present.
    pub fn get_value(&self, key: &str) -> Result<Value> {
        match self.get(
            key,
            GetOptions::default(),
            NotFoundPolicy::Reject,
            FoundPolicy::ReturnCurrent,
        )? {
            GetResult::Value(value) => Ok(value),
            // A plain single-key read renders a scalar; listing shapes only
            // appear under their respective options
            _ => Ok(Value::Null),
        }
    }

    /// Read a key, potentially blocking for its first or next value.
    ///
    /// See the module docs for the full behavior matrix. The peek read uses
    /// the transport's default timeout; a wait uses the configured ceiling,
    /// and its timeout or cancellation surfaces as `WaitTimeout` /
    /// `WaitCanceled`, never as `KeyNotFound`.
    pub fn get(
        &self,
        key: &str,
        options: GetOptions,
        not_found: NotFoundPolicy,
        found: FoundPolicy,
    ) -> Result<GetResult> {
        let path = normalize(key);
        let mut parts = vec![format!("{}/v1/kv/{}", self.config.base_url, path)];
        if options.recurse {
            parts.push("recurse".to_string());
        }
        parts.extend(self.token_parameter());
        if let Some(consistency) = &options.consistency {
            parts.push(consistency.clone());
        }
        parts.extend(self.dc_parameter(options.dc.as_deref()));
        if options.keys {
            parts.push("keys".to_string());
            if let Some(separator) = &options.separator {
                parts.extend(use_named_parameter("separator", separator));
            }
        }

        // Peek read: 404 is an answer here, not a failure
        let peek = self
            .transport
            .get(&concat_url(&parts))
            .map_err(transport_error)?;
        tracing::debug!(target: "emissary::kv", key = %path, status = peek.status, "peek read");

        let index = match peek.status {
            404 => match not_found {
                NotFoundPolicy::Reject => return Err(Error::KeyNotFound(key.to_string())),
                NotFoundPolicy::ReturnDefault => {
                    return Ok(GetResult::Value(Value::String(String::new())))
                }
                NotFoundPolicy::Wait => peek.change_index().unwrap_or(0),
            },
            200 => match found {
                FoundPolicy::Reject => return Err(Error::KeyAlreadyExists(key.to_string())),
                FoundPolicy::ReturnCurrent => return render(&peek.body, &options),
                FoundPolicy::Wait => peek.change_index().unwrap_or(0),
            },
            status => return Err(Error::UnknownStatus { status }),
        };

        // Wait for the first/next value after the observed index. The store
        // guarantees a value exists once a change is reported, so this
        // response never signals not-found.
        parts.extend(use_named_parameter("index", &index.to_string()));
        tracing::debug!(target: "emissary::kv", key = %path, index, "blocking for change");
        let raw = self
            .transport
            .get_with_timeout(&concat_url(&parts), self.config.wait_ceiling)
            .map_err(|e| match e {
                TransportError::Timeout => Error::WaitTimeout,
                TransportError::Canceled => Error::WaitCanceled,
                TransportError::Network(msg) => Error::Transport(msg),
            })?;
        render(&raw.body, &options)
    }

    /// Write a value under a key.
    ///
    /// A map-like value expands into one write per leaf: each child is put
    /// at `key/child` with the same options, sequentially in the map's
    /// iteration order. The expansion is NOT transactional - a child
    /// failure aborts the remaining children without rolling back the ones
    /// already written - and the returned bool reflects the last attempted
    /// write. A compare-and-swap miss is the normal `Ok(false)`, not an
    /// error.
    pub fn put(&self, key: &str, value: Value, options: Option<PutOptions>) -> Result<bool> {
        if let Value::Object(map) = &value {
            let mut last = true;
            for (child, child_value) in map {
                last = self.put(&format!("{}/{}", key, child), child_value.clone(), options.clone())?;
            }
            return Ok(last);
        }

        let path = normalize(key);
        let (body, tag) = encode(&value);
        let mut parts = vec![format!("{}/v1/kv/{}", self.config.base_url, path)];
        parts.extend(self.token_parameter());
        parts.push(format!("flags={}", tag.flags()));
        if let Some(cas) = options.as_ref().and_then(|o| o.cas) {
            parts.extend(use_named_parameter("cas", &cas.to_string()));
        }
        parts.extend(self.dc_parameter(options.as_ref().and_then(|o| o.dc.as_deref())));

        let response = self
            .transport
            .put(&concat_url(&parts), &body)
            .map_err(transport_error)?;
        tracing::debug!(target: "emissary::kv", key = %path, flags = tag.flags(), status = response.status, "write");
        // The store reports success as a literal "true" body
        Ok(response.body.trim() == "true")
    }

    /// Delete a key, optionally an entire prefix.
    pub fn delete(&self, key: &str, options: Option<DeleteOptions>) -> Result<Response> {
        let path = normalize(key);
        let mut parts = vec![format!("{}/v1/kv/{}", self.config.base_url, path)];
        if options.as_ref().is_some_and(|o| o.recurse) {
            parts.push("recurse".to_string());
        }
        parts.extend(self.token_parameter());
        parts.extend(self.dc_parameter(options.as_ref().and_then(|o| o.dc.as_deref())));

        let response = self
            .transport
            .delete(&concat_url(&parts))
            .map_err(transport_error)?;
        tracing::debug!(target: "emissary::kv", key = %path, status = response.status, "delete");
        Ok(response)
    }

    fn token_parameter(&self) -> Vec<String> {
        match &self.config.token {
            Some(token) => use_named_parameter("token", token),
            None => Vec::new(),
        }
    }

    fn dc_parameter(&self, dc: Option<&str>) -> Vec<String> {
        match dc.or(self.config.datacenter.as_deref()) {
            Some(dc) => use_named_parameter("dc", dc),
            None => Vec::new(),
        }
    }
}

/// Shape the parsed response per the read options.
fn render(body: &str, options: &GetOptions) -> Result<GetResult> {
    if options.keys {
        let keys: Vec<String> =
            serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;
        return Ok(GetResult::Keys(keys));
    }

    let entries: Vec<KvEntry> =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    if options.modify_index {
        let index = entries.first().map(|e| e.modify_index).unwrap_or(0);
        return Ok(GetResult::Index(index));
    }

    let decoded: Vec<DecodedEntry> = entries.iter().map(KvEntry::decoded).collect();

    if options.decode_values {
        return Ok(GetResult::Entries(decoded));
    }
    if options.convert_to_hash {
        let pairs: Vec<(String, Value)> = select_pairs(decoded, options)
            .into_iter()
            .map(|pair| (pair.key, pair.value))
            .collect();
        return Ok(GetResult::Tree(build_tree(&pairs)));
    }
    if decoded.len() == 1 {
        let value = decoded.into_iter().next().map(|e| e.value).unwrap_or(Value::Null);
        return Ok(GetResult::Value(transform(&options.transformation, value)));
    }
    Ok(GetResult::Pairs(select_pairs(decoded, options)))
}

/// Filter null-valued entries (unless `nil_values`) and apply the
/// transformation, preserving listing order.
fn select_pairs(decoded: Vec<DecodedEntry>, options: &GetOptions) -> Vec<KvPair> {
    decoded
        .into_iter()
        .filter(|entry| options.nil_values || !entry.value.is_null())
        .map(|entry| KvPair {
            key: entry.key,
            value: transform(&options.transformation, entry.value),
        })
        .collect()
}

/// Transformations skip null values.
fn transform(transformation: &Option<Transformation>, value: Value) -> Value {
    match transformation {
        Some(f) if !value.is_null() => f(value),
        _ => value,
    }
}

fn use_named_parameter(name: &str, value: &str) -> Vec<String> {
    vec![format!("{}={}", name, value)]
}

/// Transport failures outside the blocking wait read carry no protocol
/// meaning; the wait read maps its own errors so timeouts stay distinct.
fn transport_error(e: TransportError) -> Error {
    Error::Transport(e.to_string())
}

/// Assemble a URL from its parts: the path, then `?`-joined parameters.
fn concat_url(parts: &[String]) -> String {
    match parts.split_first() {
        Some((path, [])) => path.clone(),
        Some((path, params)) => format!("{}?{}", path, params.join("&")),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_url_path_only() {
        assert_eq!(concat_url(&["http://s/v1/kv/a".to_string()]), "http://s/v1/kv/a");
    }

    #[test]
    fn test_concat_url_with_parameters() {
        let parts = vec![
            "http://s/v1/kv/a".to_string(),
            "recurse".to_string(),
            "dc=dc1".to_string(),
        ];
        assert_eq!(concat_url(&parts), "http://s/v1/kv/a?recurse&dc=dc1");
    }

    #[test]
    fn test_use_named_parameter() {
        assert_eq!(use_named_parameter("index", "42"), vec!["index=42".to_string()]);
    }

    #[test]
    fn test_policy_defaults_are_the_normal_read() {
        assert_eq!(NotFoundPolicy::default(), NotFoundPolicy::Reject);
        assert_eq!(FoundPolicy::default(), FoundPolicy::ReturnCurrent);
    }

    #[test]
    fn test_get_options_builder() {
        let options = GetOptions::default()
            .recurse()
            .keys()
            .with_separator("/")
            .with_dc("dc2")
            .nil_values();
        assert!(options.recurse);
        assert!(options.keys);
        assert_eq!(options.separator.as_deref(), Some("/"));
        assert_eq!(options.dc.as_deref(), Some("dc2"));
        assert!(options.nil_values);
        assert!(!options.modify_index);
    }

    #[test]
    fn test_transform_skips_null() {
        let t: Option<Transformation> = Some(Box::new(|_| Value::Int(1)));
        assert_eq!(transform(&t, Value::Null), Value::Null);
        assert_eq!(transform(&t, Value::Int(0)), Value::Int(1));
        assert_eq!(transform(&None, Value::Int(0)), Value::Int(0));
    }

    #[test]
    fn test_render_single_entry_scalar() {
        let body = r#"[{"Key": "a", "Value": "NDI=", "Flags": 8, "ModifyIndex": 9}]"#;
        let result = render(body, &GetOptions::default()).unwrap();
        assert_eq!(result, GetResult::Value(Value::Int(42)));
    }

    #[test]
    fn test_render_modify_index() {
        let body = r#"[{"Key": "a", "Value": "NDI=", "Flags": 8, "ModifyIndex": 9}]"#;
        let result = render(body, &GetOptions::default().modify_index()).unwrap();
        assert_eq!(result, GetResult::Index(9));
    }

    #[test]
    fn test_render_keys_listing() {
        let body = r#"["a/b", "a/c"]"#;
        let result = render(body, &GetOptions::default().keys()).unwrap();
        assert_eq!(
            result,
            GetResult::Keys(vec!["a/b".to_string(), "a/c".to_string()])
        );
    }

    #[test]
    fn test_render_malformed_body_is_invalid_response() {
        let err = render("not json", &GetOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
