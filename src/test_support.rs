//! Scripted collaborators for tests: provider, registry, document, edit
//! recorder, notifier, and selector.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use lsp_types::{Url, WorkspaceEdit};
use serde_json::{json, Value};

use crate::{
    document::{BufferDiagnostic, DocumentAccess, EditError, WorkspaceEditSink},
    notify::{Notifier, Severity},
    picker::FixSelector,
    provider::{
        ActionProvider, ProviderError, ProviderId, ProviderRegistry, ReplyHandle, ReplySender,
        CODE_ACTION_METHOD, EXECUTE_COMMAND_METHOD, RESOLVE_METHOD,
    },
    range::PositionEncoding,
};

struct ProviderState {
    id: ProviderId,
    name: String,
    methods: Mutex<Vec<String>>,
    replies: Mutex<HashMap<String, VecDeque<Result<Value, ProviderError>>>>,
    requests: Mutex<Vec<(String, Value)>>,
    delay: Mutex<Option<Duration>>,
    silent: Mutex<bool>,
    parked: Mutex<Vec<ReplySender>>,
    encoding: Mutex<PositionEncoding>,
}

/// A provider answering from scripted reply queues, one queue per method.
/// Clones share state, so a clone handed to the engine stays observable.
#[derive(Clone)]
pub(crate) struct FakeProvider {
    state: Arc<ProviderState>,
}

impl FakeProvider {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            state: Arc::new(ProviderState {
                id: ProviderId(id),
                name: name.to_string(),
                methods: Mutex::new(vec![
                    CODE_ACTION_METHOD.to_string(),
                    RESOLVE_METHOD.to_string(),
                    EXECUTE_COMMAND_METHOD.to_string(),
                ]),
                replies: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
                delay: Mutex::new(None),
                silent: Mutex::new(false),
                parked: Mutex::new(Vec::new()),
                encoding: Mutex::new(PositionEncoding::Utf16),
            }),
        }
    }

    /// Restrict the advertised capabilities.
    pub fn with_methods(self, methods: &[&str]) -> Self {
        *self.state.methods.lock().unwrap() =
            methods.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Delay every reply by `ms` milliseconds.
    pub fn with_delay_ms(self, ms: u64) -> Self {
        *self.state.delay.lock().unwrap() = Some(Duration::from_millis(ms));
        self
    }

    /// Never answer; requests stay outstanding with a live sender.
    pub fn silent(self) -> Self {
        *self.state.silent.lock().unwrap() = true;
        self
    }

    pub fn with_encoding(self, encoding: PositionEncoding) -> Self {
        *self.state.encoding.lock().unwrap() = encoding;
        self
    }

    /// Queue the next reply for `method`.
    pub fn enqueue(&self, method: &str, result: Result<Value, ProviderError>) {
        self.state
            .replies
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(result);
    }

    /// Every request issued so far, in order.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params)
            .collect()
    }
}

impl ActionProvider for FakeProvider {
    fn id(&self) -> ProviderId {
        self.state.id
    }

    fn name(&self) -> &str {
        &self.state.name
    }

    fn supports(&self, method: &str) -> bool {
        self.state
            .methods
            .lock()
            .unwrap()
            .iter()
            .any(|m| m == method)
    }

    fn position_encoding(&self) -> PositionEncoding {
        *self.state.encoding.lock().unwrap()
    }

    fn request(&self, method: &str, params: Value) -> ReplyHandle {
        self.state
            .requests
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        if *self.state.silent.lock().unwrap() {
            let (sender, handle) = ReplyHandle::channel();
            self.state.parked.lock().unwrap().push(sender);
            return handle;
        }

        let result = self
            .state
            .replies
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(Value::Null));

        match *self.state.delay.lock().unwrap() {
            None => ReplyHandle::ready(result),
            Some(delay) => {
                let (sender, handle) = ReplyHandle::channel();
                thread::spawn(move || {
                    thread::sleep(delay);
                    sender.send(result);
                });
                handle
            }
        }
    }
}

/// Registry over shared fake providers.
pub(crate) struct FakeRegistry {
    providers: Vec<FakeProvider>,
}

impl FakeRegistry {
    pub fn new(providers: &[&FakeProvider]) -> Self {
        Self {
            providers: providers.iter().map(|p| (*p).clone()).collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl ProviderRegistry for FakeRegistry {
    fn providers(&self) -> Vec<Arc<dyn ActionProvider>> {
        self.providers
            .iter()
            .map(|p| Arc::new(p.clone()) as Arc<dyn ActionProvider>)
            .collect()
    }

    fn get(&self, id: ProviderId) -> Option<Arc<dyn ActionProvider>> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| Arc::new(p.clone()) as Arc<dyn ActionProvider>)
    }
}

pub(crate) fn providers_of(list: &[&FakeProvider]) -> Vec<Arc<dyn ActionProvider>> {
    list.iter()
        .map(|p| Arc::new((*p).clone()) as Arc<dyn ActionProvider>)
        .collect()
}

/// Fixed-content document with a scripted diagnostic snapshot.
pub(crate) struct FakeDocument {
    uri: Url,
    lines: Vec<String>,
    diagnostics: Vec<BufferDiagnostic>,
}

impl FakeDocument {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            uri: Url::parse("file:///tmp/buffer.txt").expect("static uri"),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<BufferDiagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl DocumentAccess for FakeDocument {
    fn uri(&self) -> Url {
        self.uri.clone()
    }

    fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    fn line(&self, index: u32) -> Option<&str> {
        self.lines.get(index as usize).map(String::as_str)
    }

    fn diagnostics(&self) -> Vec<BufferDiagnostic> {
        self.diagnostics.clone()
    }
}

/// Records applied workspace edits; optionally refuses them.
#[derive(Default)]
pub(crate) struct RecordingEdits {
    pub applied: Vec<WorkspaceEdit>,
    pub fail: bool,
}

impl WorkspaceEditSink for RecordingEdits {
    fn apply_edit(
        &mut self,
        edit: &WorkspaceEdit,
        _encoding: PositionEncoding,
    ) -> Result<(), EditError> {
        if self.fail {
            return Err(EditError::new("sink refused the edit"));
        }
        self.applied.push(edit.clone());
        Ok(())
    }
}

/// Captures notifications for assertions.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub messages: Vec<(Severity, String)>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&(Severity, String)> {
        self.messages.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, severity: Severity, message: &str) {
        self.messages.push((severity, message.to_string()));
    }
}

/// Returns scripted choices and captures the presented labels.
#[derive(Default)]
pub(crate) struct ScriptedSelector {
    pub choices: Vec<usize>,
    pub seen: Vec<String>,
    pub multi_select: bool,
}

impl ScriptedSelector {
    pub fn choosing(choices: Vec<usize>) -> Self {
        Self {
            choices,
            ..Self::default()
        }
    }
}

impl FixSelector for ScriptedSelector {
    fn pick(&mut self, items: &[String], multi_select: bool) -> Vec<usize> {
        self.seen = items.to_vec();
        self.multi_select = multi_select;
        self.choices.clone()
    }
}

/// A code-action reply item carrying an inline edit.
pub(crate) fn edit_action(title: &str, kind: &str, preferred: bool) -> Value {
    json!({
        "title": title,
        "kind": kind,
        "edit": {"changes": {"file:///tmp/buffer.txt": [
            {"range": {"start": {"line": 0, "character": 0},
                       "end": {"line": 0, "character": 1}},
             "newText": ""}
        ]}},
        "isPreferred": preferred,
    })
}
