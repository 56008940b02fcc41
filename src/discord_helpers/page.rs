use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, EditMessage,
};

use super::PaginatorError;

pub const PREVIOUS_ID: &str = "page_turner:previous";
pub const NEXT_ID: &str = "page_turner:next";

/// One renderable page, produced by a [`PageFormatter`](super::multipage_embed::PageFormatter).
#[derive(Debug, Clone)]
pub enum Page {
    Text(String),
    Embed(CreateEmbed),
    /// Several pages shown together. Every element must be an [`Page::Embed`].
    List(Vec<Page>),
    /// Full control over the message; passed through untouched.
    Raw(PagePayload),
}

impl Page {
    fn kind(&self) -> &'static str {
        match self {
            Page::Text(_) => "text",
            Page::Embed(_) => "embed",
            Page::List(_) => "list",
            Page::Raw(_) => "raw payload",
        }
    }
}

impl From<CreateEmbed> for Page {
    fn from(embed: CreateEmbed) -> Self {
        Page::Embed(embed)
    }
}

impl From<String> for Page {
    fn from(text: String) -> Self {
        Page::Text(text)
    }
}

impl From<&str> for Page {
    fn from(text: &str) -> Self {
        Page::Text(text.to_string())
    }
}

/// The slice of pages that [`get_page`](super::multipage_embed::Paginator::get_page) hands out.
#[derive(Debug)]
pub enum Chunk<'a, T> {
    Single(&'a T),
    Group(&'a [T]),
    /// there is nothing to show, the paginator was built without pages
    Empty,
}

/// Everything needed to send or edit a paginated message.
///
/// `components` is `None` when the payload does not touch the message components at all,
/// and `Some(vec![])` when it strips them.
#[derive(Debug, Clone, Default)]
pub struct PagePayload {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    pub components: Option<Vec<CreateActionRow>>,
}

impl PagePayload {
    pub fn without_components(mut self) -> Self {
        self.components = Some(Vec::new());
        self
    }

    pub fn to_message(&self) -> CreateMessage {
        let mut builder = CreateMessage::new().embeds(self.embeds.clone());
        if let Some(content) = &self.content {
            builder = builder.content(content);
        }
        if let Some(components) = &self.components {
            builder = builder.components(components.clone());
        }
        builder
    }

    pub fn to_response(&self) -> CreateInteractionResponseMessage {
        let mut builder = CreateInteractionResponseMessage::new().embeds(self.embeds.clone());
        if let Some(content) = &self.content {
            builder = builder.content(content);
        }
        if let Some(components) = &self.components {
            builder = builder.components(components.clone());
        }
        builder
    }

    /// Replaces the message a button was pressed on. Like an edit, a missing content clears it.
    pub fn to_update(&self) -> CreateInteractionResponseMessage {
        let mut builder = CreateInteractionResponseMessage::new()
            .content(self.content.clone().unwrap_or_default())
            .embeds(self.embeds.clone());
        if let Some(components) = &self.components {
            builder = builder.components(components.clone());
        }
        builder
    }

    pub fn to_followup(&self) -> CreateInteractionResponseFollowup {
        let mut builder = CreateInteractionResponseFollowup::new().embeds(self.embeds.clone());
        if let Some(content) = &self.content {
            builder = builder.content(content);
        }
        if let Some(components) = &self.components {
            builder = builder.components(components.clone());
        }
        builder
    }

    /// Edits replace the whole message, so a missing content clears the old one.
    pub fn to_edit(&self) -> EditMessage {
        let mut builder = EditMessage::new()
            .content(self.content.clone().unwrap_or_default())
            .embeds(self.embeds.clone());
        if let Some(components) = &self.components {
            builder = builder.components(components.clone());
        }
        builder
    }
}

/// Enabled state of the two navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationControls {
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl NavigationControls {
    pub fn for_position(current_page: usize, max_pages: usize) -> Self {
        Self {
            previous_disabled: current_page == 0,
            next_disabled: current_page + 1 >= max_pages,
        }
    }

    pub fn action_row(&self) -> CreateActionRow {
        CreateActionRow::Buttons(vec![
            CreateButton::new(PREVIOUS_ID)
                .label("<")
                .style(ButtonStyle::Secondary)
                .disabled(self.previous_disabled),
            CreateButton::new(NEXT_ID)
                .label(">")
                .style(ButtonStyle::Secondary)
                .disabled(self.next_disabled),
        ])
    }
}

/// Turns a formatted page into a message payload with the navigation buttons attached.
pub fn render_payload(
    page: Page,
    controls: NavigationControls,
) -> Result<PagePayload, PaginatorError> {
    let mut payload = match page {
        Page::Text(text) => PagePayload {
            content: Some(text),
            ..Default::default()
        },
        Page::Embed(embed) => PagePayload {
            embeds: vec![embed],
            ..Default::default()
        },
        Page::List(pages) => {
            let mut embeds = Vec::with_capacity(pages.len());
            for (index, page) in pages.into_iter().enumerate() {
                match page {
                    Page::Embed(embed) => embeds.push(embed),
                    other => {
                        return Err(PaginatorError::InvalidPageFormat {
                            index,
                            found: other.kind(),
                        })
                    }
                }
            }
            PagePayload {
                embeds,
                ..Default::default()
            }
        }
        Page::Raw(raw) => {
            // a raw payload with its own rows keeps them
            if raw.components.is_some() {
                return Ok(raw);
            }
            raw
        }
    };

    payload.components = Some(vec![controls.action_row()]);
    Ok(payload)
}
