//! The commands, bridging a document, the settings and the completion service.
//!
//! Every command starts from the live document: the outline and the chat are read fresh on
//! each call and nothing parsed is kept between calls. A command that talks to the service
//! plans its edit from the document as it was, waits for the reply under a busy guard and
//! only then writes. When anything fails the document is left untouched.

use crate::busy::{BusyGuard, BusyIndicator, TerminalStatus};
use crate::chat_settings::ChatConfig;
use crate::completion::{CompletionRequest, CompletionService, OpenAiClient};
use crate::config::Config;
use crate::dialect::{self, ChatSource, Dialect, TemplateSource};
use crate::document::Editor;
use crate::edit_plan::{Edit, EditPlan};
use crate::error::ChatError;
use crate::formats::markdown::MarkdownFormat;
use crate::merge;
use crate::outline::extract_headings;
use crate::picker::Picker;
use crate::template::{FolderTemplates, NoTemplates, TemplateStore};
use crate::title::{self, Subject};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a picked title went.
pub enum TitleChoice {
    /// The chat's config line was rewritten.
    Section(String),
    /// The document should be renamed; the caller owns the file.
    Document(String),
}

/// Settings, dialect and collaborators for one run.
pub struct AppState {
    config: Config,
    dialect: Box<dyn Dialect>,
    templates: Box<dyn TemplateStore>,
    service: Option<Box<dyn CompletionService>>,
    busy: Box<dyn BusyIndicator>,
}

fn template_store(config: &Config) -> Box<dyn TemplateStore> {
    match &config.template_folder {
        Some(folder) if !folder.trim().is_empty() => Box::new(FolderTemplates::new(folder)),
        _ => Box::new(NoTemplates),
    }
}

impl AppState {
    #[must_use]
    /// State for `config`, talking to the configured API when a key is available.
    pub fn new(config: Config) -> Self {
        let service = config.api_key().map(|key| {
            Box::new(OpenAiClient::new(key, config.api_base.clone())) as Box<dyn CompletionService>
        });
        Self {
            dialect: dialect::build(config.dialect_kind(), config.dialect_config()),
            templates: template_store(&config),
            busy: Box::new(TerminalStatus::new(&config.chat_name)),
            service,
            config,
        }
    }

    #[must_use]
    /// Use `service` for completions.
    pub fn with_service(mut self, service: Box<dyn CompletionService>) -> Self {
        self.service = Some(service);
        self
    }

    #[must_use]
    /// Use `templates` as the template store.
    pub fn with_templates(mut self, templates: Box<dyn TemplateStore>) -> Self {
        self.templates = templates;
        self
    }

    #[must_use]
    /// Show progress on `busy`.
    pub fn with_busy(mut self, busy: Box<dyn BusyIndicator>) -> Self {
        self.busy = busy;
        self
    }

    #[must_use]
    /// Settings in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Switch to new settings, rebuilding the dialect and the template store.
    ///
    /// The completion service is kept.
    pub fn apply_config(&mut self, config: Config) {
        self.dialect = dialect::build(config.dialect_kind(), config.dialect_config());
        self.templates = template_store(&config);
        self.config = config;
        tracing::debug!(dialect = %self.config.dialect, "settings applied");
    }

    /// Names of the available templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the template store cannot be read.
    pub fn templates(&self) -> Result<Vec<String>, ChatError> {
        self.templates.list()
    }

    /// Read the chat around the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ChatNotFound`] when there is no chat above the cursor.
    pub fn read_chat(&self, editor: &dyn Editor) -> Result<ChatSource, ChatError> {
        let headings = if self.dialect.uses_outline() {
            extract_headings(&editor.text(), &MarkdownFormat)?
        } else {
            Vec::new()
        };
        self.dialect.read_chat(editor, &headings)
    }

    /// Template a chat uses, falling back to the default template.
    ///
    /// A name that does not resolve to a template is not an error; the chat simply has no
    /// template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template exists but cannot be read.
    pub fn resolve_template(&self, inline: &ChatConfig) -> Result<Option<TemplateSource>, ChatError> {
        let Some(name) = merge::template_name(inline, self.config.default_template.as_deref())
        else {
            return Ok(None);
        };
        match self.templates.load(name)? {
            Some(text) => {
                tracing::debug!(template = name, "template resolved");
                Ok(Some(self.dialect.parse_template(&text)))
            }
            None => {
                tracing::warn!(template = name, "template not found, continuing without it");
                Ok(None)
            }
        }
    }

    /// Chat around the cursor and the request that would answer it.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ChatNotFound`] or [`ChatError::NoUserMessage`] when there is
    /// nothing to answer.
    pub fn prepare_request(
        &self,
        editor: &dyn Editor,
    ) -> Result<(ChatSource, CompletionRequest), ChatError> {
        let source = self.read_chat(editor)?;
        let template = self.resolve_template(&source.config)?;
        let request = merge::build_request(self.dialect.config(), template.as_ref(), &source)?;
        tracing::info!(
            section = source.section.heading_line,
            messages = request.messages.len(),
            model = %request.model,
            "request prepared"
        );
        Ok((source, request))
    }

    /// Send `request` while the busy indicator is on.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        let service = self.service.as_ref().ok_or(ChatError::MissingApiKey)?;
        let _busy = BusyGuard::acquire(self.busy.as_ref());
        let reply = service.complete(request)?;
        tracing::info!(chars = reply.len(), "response received");
        Ok(reply)
    }

    /// Answer the chat around the cursor and write the reply into it.
    ///
    /// # Errors
    ///
    /// Returns an error when there is no chat to answer or the service fails; the document
    /// is then unchanged.
    pub fn chat(&self, editor: &mut dyn Editor) -> Result<EditPlan, ChatError> {
        let (source, request) = self.prepare_request(editor)?;
        let reply = self.complete(&request)?;
        let plan = self.dialect.plan_response(&source, &reply);
        plan.apply(editor);
        Ok(plan)
    }

    /// Start an empty chat at the cursor, optionally naming a template.
    pub fn new_chat(&self, editor: &mut dyn Editor, template: Option<&str>) -> EditPlan {
        let plan = self.dialect.plan_new_chat(editor, template);
        plan.apply(editor);
        plan
    }

    /// Let the user pick a template, then start a chat using it.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NoTemplates`] when there is nothing to pick and
    /// [`ChatError::Cancelled`] when the picker is dismissed.
    pub fn new_chat_with_template(
        &self,
        editor: &mut dyn Editor,
        picker: &mut dyn Picker,
    ) -> Result<EditPlan, ChatError> {
        let names = self.templates.list()?;
        if names.is_empty() {
            return Err(ChatError::NoTemplates);
        }
        let name = picker
            .pick("Templates", &names)?
            .ok_or(ChatError::Cancelled)?;
        Ok(self.new_chat(editor, Some(&name)))
    }

    /// Ask for title suggestions and apply the one the user picks.
    ///
    /// Section titles are written into the chat's config line. Document titles are returned
    /// for the caller to rename the file with; without a chat, the whole document is
    /// summarised instead.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NoSectionForTitle`] when a section title is asked for outside a
    /// chat, [`ChatError::TitleUnsupported`] when the dialect has no titles, and
    /// [`ChatError::Cancelled`] when the picker is dismissed.
    pub fn infer_title(
        &self,
        editor: &mut dyn Editor,
        picker: &mut dyn Picker,
        document_title: bool,
    ) -> Result<TitleChoice, ChatError> {
        let text = editor.text();
        let source = match self.read_chat(editor) {
            Ok(source) => Some(source),
            Err(ChatError::ChatNotFound) if document_title => None,
            Err(ChatError::ChatNotFound) => return Err(ChatError::NoSectionForTitle),
            Err(e) => return Err(e),
        };
        if !document_title && !self.dialect.has_titles() {
            return Err(ChatError::TitleUnsupported);
        }

        let subject = match &source {
            Some(source) => Subject::Chat(&source.messages),
            None => Subject::Document(&text),
        };
        let reply = self.complete(&title::title_request(&subject)?)?;
        let options = title::suggestions(&reply, document_title);
        if options.is_empty() {
            return Err(ChatError::EmptyResponse);
        }
        let title = picker.pick("Titles", &options)?.ok_or(ChatError::Cancelled)?;

        if document_title {
            return Ok(TitleChoice::Document(title));
        }
        let source = source.ok_or(ChatError::NoSectionForTitle)?;
        let plan = self
            .dialect
            .plan_title(&source, &title, editor.cursor())
            .ok_or(ChatError::TitleUnsupported)?;
        plan.apply(editor);
        Ok(TitleChoice::Section(title))
    }

    /// Ask for keywords describing the chat (or the whole document) and insert them at the
    /// cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails.
    pub fn infer_keywords(&self, editor: &mut dyn Editor) -> Result<EditPlan, ChatError> {
        let text = editor.text();
        let source = match self.read_chat(editor) {
            Ok(source) => Some(source),
            Err(ChatError::ChatNotFound) => None,
            Err(e) => return Err(e),
        };
        let subject = match &source {
            Some(source) => Subject::Chat(&source.messages),
            None => Subject::Document(&text),
        };
        let reply = self.complete(&title::keyword_request(&subject)?)?;
        let cursor = editor.cursor();
        let plan = EditPlan::single(Edit::insert(cursor, reply.trim()), cursor);
        plan.apply(editor);
        Ok(plan)
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
