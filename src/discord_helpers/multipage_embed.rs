/*
 * Embeds with multiple traversable pages.
 * Each page is shown in the same message and users move through them with the `<` and `>` buttons.
 *
 * The paginator itself only tracks where the user is and renders pages. Listening for button
 * presses and giving up after the timeout lives in `session.rs`. Once a session ends the buttons
 * are removed from the message (or the message is deleted) so it no longer looks interactive.
 */

use std::{fmt, num::NonZeroUsize, time::Duration};

use serenity::{all::MessageId, async_trait};

use super::{
    page::{render_payload, Chunk, NavigationControls, Page, PagePayload, NEXT_ID, PREVIOUS_ID},
    transport::{ButtonPress, CommandContext, DisplayHandle, InteractionContext},
    PaginatorError,
};
use crate::hey;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
pub const DEFAULT_EMPTY_TEXT: &str = "There is nothing to show here.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorOptions {
    /// How long to wait for the next button press. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Delete the message when the paginator stops instead of just removing the buttons.
    pub delete_message_after: bool,
    pub per_page: NonZeroUsize,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            delete_message_after: false,
            per_page: NonZeroUsize::MIN,
        }
    }
}

/// Turns raw page content into something that can be shown.
///
/// Implementations that have nothing to wait on simply never `.await`.
#[async_trait]
pub trait PageFormatter: Send + Sync {
    type Item: Send + Sync + 'static;

    async fn format_page(&self, chunk: Chunk<'_, Self::Item>) -> Result<Page, PaginatorError>;
}

/// Shows pages exactly as they were given.
#[derive(Debug, Clone)]
pub struct AsIs {
    empty_text: String,
}

impl AsIs {
    pub fn new<S: Into<String>>(empty_text: S) -> Self {
        Self {
            empty_text: empty_text.into(),
        }
    }
}

impl Default for AsIs {
    fn default() -> Self {
        Self::new(DEFAULT_EMPTY_TEXT)
    }
}

#[async_trait]
impl PageFormatter for AsIs {
    type Item = Page;

    async fn format_page(&self, chunk: Chunk<'_, Page>) -> Result<Page, PaginatorError> {
        Ok(match chunk {
            Chunk::Single(page) => page.clone(),
            Chunk::Group(pages) => Page::List(pages.to_vec()),
            Chunk::Empty => Page::Text(self.empty_text.clone()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn from_custom_id(id: &str) -> Option<Self> {
        match id {
            PREVIOUS_ID => Some(Direction::Previous),
            NEXT_ID => Some(Direction::Next),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Previous => write!(f, "back"),
            Direction::Next => write!(f, "forward"),
        }
    }
}

/// Where the paginator was started from. Fixed after the first start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Command,
    Interaction,
}

/// What a paginator is started from. Exactly one of the two must be set.
#[derive(Default, Clone, Copy)]
pub struct Invocation<'a> {
    command: Option<&'a dyn CommandContext>,
    interaction: Option<&'a dyn InteractionContext>,
}

impl<'a> Invocation<'a> {
    pub fn command(command: &'a dyn CommandContext) -> Self {
        Self {
            command: Some(command),
            interaction: None,
        }
    }

    pub fn interaction(interaction: &'a dyn InteractionContext) -> Self {
        Self {
            command: None,
            interaction: Some(interaction),
        }
    }

    pub fn from_parts(
        command: Option<&'a dyn CommandContext>,
        interaction: Option<&'a dyn InteractionContext>,
    ) -> Self {
        Self {
            command,
            interaction,
        }
    }

    fn bind(self) -> Result<Binding<'a>, PaginatorError> {
        match (self.command, self.interaction) {
            (Some(command), None) => Ok(Binding::Command(command)),
            (None, Some(interaction)) => Ok(Binding::Interaction(interaction)),
            _ => Err(PaginatorError::InvalidInvocation),
        }
    }
}

enum Binding<'a> {
    Command(&'a dyn CommandContext),
    Interaction(&'a dyn InteractionContext),
}

impl Binding<'_> {
    fn source(&self) -> Source {
        match self {
            Binding::Command(_) => Source::Command,
            Binding::Interaction(_) => Source::Interaction,
        }
    }
}

enum Lifecycle {
    Idle,
    Active {
        source: Source,
        handle: Box<dyn DisplayHandle>,
        /// what the message shows right now
        shown: PagePayload,
    },
    Stopped,
}

pub struct Paginator<F: PageFormatter = AsIs> {
    pages: Vec<F::Item>,
    formatter: F,
    options: PaginatorOptions,
    current_page: usize,
    max_pages: usize,
    controls: NavigationControls,
    state: Lifecycle,
}

impl Paginator<AsIs> {
    pub fn new(pages: Vec<Page>, options: PaginatorOptions) -> Self {
        Self::with_formatter(pages, AsIs::default(), options)
    }
}

impl<F: PageFormatter> Paginator<F> {
    pub fn with_formatter(pages: Vec<F::Item>, formatter: F, options: PaginatorOptions) -> Self {
        let max_pages = pages.len().div_ceil(options.per_page.get());
        Self {
            pages,
            formatter,
            options,
            current_page: 0,
            max_pages,
            controls: NavigationControls::for_position(0, max_pages),
            state: Lifecycle::Idle,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn controls(&self) -> NavigationControls {
        self.controls
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.options.timeout
    }

    pub fn source(&self) -> Option<Source> {
        match &self.state {
            Lifecycle::Active { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn message_id(&self) -> Option<MessageId> {
        match &self.state {
            Lifecycle::Active { handle, .. } => Some(handle.id()),
            _ => None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, Lifecycle::Stopped)
    }

    /// Returns the content of a page. Indices outside the paginator jump back to the first page.
    pub fn get_page(&mut self, index: usize) -> Chunk<'_, F::Item> {
        if index >= self.max_pages {
            self.current_page = 0;
            return self.chunk_at(0);
        }
        self.chunk_at(index)
    }

    fn chunk_at(&self, index: usize) -> Chunk<'_, F::Item> {
        if self.pages.is_empty() {
            return Chunk::Empty;
        }

        let per_page = self.options.per_page.get();
        if per_page == 1 {
            return Chunk::Single(&self.pages[index]);
        }

        let start = index * per_page;
        let end = (start + per_page).min(self.pages.len());
        Chunk::Group(&self.pages[start..end])
    }

    /// Renders a page without touching any state. Returns the index that was actually rendered.
    async fn render_at(
        &self,
        index: usize,
    ) -> Result<(usize, NavigationControls, PagePayload), PaginatorError> {
        let index = if index < self.max_pages { index } else { 0 };
        let controls = NavigationControls::for_position(index, self.max_pages);
        let page = self.formatter.format_page(self.chunk_at(index)).await?;
        let payload = render_payload(page, controls)?;
        Ok((index, controls, payload))
    }

    /// Formats a page and builds the message for it, buttons included.
    pub async fn render_payload(&self, index: usize) -> Result<PagePayload, PaginatorError> {
        let (_, _, payload) = self.render_at(index).await?;
        Ok(payload)
    }

    /// Shows the current page, either as a new message or by editing the one already shown.
    pub async fn start(&mut self, invocation: Invocation<'_>) -> Result<MessageId, PaginatorError> {
        let binding = invocation.bind()?;
        let source = binding.source();

        match &self.state {
            Lifecycle::Stopped => return Err(PaginatorError::Stopped),
            Lifecycle::Active { source: bound, .. } if *bound != source => {
                return Err(PaginatorError::InvalidInvocation)
            }
            _ => {}
        }

        let (index, controls, payload) = self.render_at(self.current_page).await?;

        // restarting from an interaction reuses the message we already have
        if let (Binding::Interaction(_), Lifecycle::Active { handle, shown, .. }) =
            (&binding, &mut self.state)
        {
            handle.edit(&payload).await?;
            *shown = payload;
            self.current_page = index;
            self.controls = controls;
            return Ok(handle.id());
        }

        let handle = match binding {
            Binding::Command(command) => command.send(&payload).await?,
            Binding::Interaction(interaction) => {
                if interaction.is_response_started() {
                    interaction.follow_up(&payload).await?
                } else {
                    interaction.respond(&payload).await?;
                    interaction.original_response().await?
                }
            }
        };

        let id = handle.id();
        self.current_page = index;
        self.controls = controls;
        self.state = Lifecycle::Active {
            source,
            handle,
            shown: payload,
        };
        Ok(id)
    }

    /// Moves one page in `direction` and edits the shown message to match.
    ///
    /// The buttons are disabled at either end, but a press can still arrive from an outdated
    /// message, so moving past the ends is refused with [`PaginatorError::AtBoundary`].
    pub async fn navigate(&mut self, direction: Direction) -> Result<(), PaginatorError> {
        self.turn(direction, None).await
    }

    /// Like [`navigate`](Self::navigate), but answers `press` by updating the message it was
    /// pressed on instead of editing the message through the channel.
    pub async fn navigate_from(
        &mut self,
        direction: Direction,
        press: &dyn ButtonPress,
    ) -> Result<(), PaginatorError> {
        self.turn(direction, Some(press)).await
    }

    async fn turn(
        &mut self,
        direction: Direction,
        press: Option<&dyn ButtonPress>,
    ) -> Result<(), PaginatorError> {
        match self.state {
            Lifecycle::Idle => return Err(PaginatorError::NotStarted),
            Lifecycle::Stopped => return Err(PaginatorError::Stopped),
            Lifecycle::Active { .. } => {}
        }

        let target = match direction {
            Direction::Previous => self.current_page.checked_sub(1),
            Direction::Next => Some(self.current_page + 1).filter(|next| *next < self.max_pages),
        }
        .ok_or(PaginatorError::AtBoundary(direction))?;

        let (index, controls, payload) = self.render_at(target).await?;
        if let Lifecycle::Active { handle, shown, .. } = &mut self.state {
            match press {
                Some(press) => press.update(&payload).await?,
                None => handle.edit(&payload).await?,
            }
            *shown = payload;
        }
        self.current_page = index;
        self.controls = controls;
        Ok(())
    }

    pub async fn previous_page(&mut self) -> Result<(), PaginatorError> {
        self.navigate(Direction::Previous).await
    }

    pub async fn next_page(&mut self) -> Result<(), PaginatorError> {
        self.navigate(Direction::Next).await
    }

    /// Stops the paginator for good and hands back the message it was showing.
    pub fn stop(&mut self) -> Option<Box<dyn DisplayHandle>> {
        self.release().map(|(handle, _)| handle)
    }

    fn release(&mut self) -> Option<(Box<dyn DisplayHandle>, PagePayload)> {
        match std::mem::replace(&mut self.state, Lifecycle::Stopped) {
            Lifecycle::Active { handle, shown, .. } => Some((handle, shown)),
            _ => None,
        }
    }

    /// Stops the paginator and cleans up the message: deleted, or left with its buttons removed.
    ///
    /// If the page can no longer be formatted the buttons are still removed from what was last
    /// shown, and the formatting error is returned afterwards.
    pub async fn close(&mut self) -> Result<(), PaginatorError> {
        let Some((mut handle, shown)) = self.release() else {
            return Ok(());
        };

        if self.options.delete_message_after {
            return handle.delete().await;
        }

        match self.render_at(self.current_page).await {
            Ok((_, _, payload)) => handle.edit(&payload.without_components()).await,
            Err(e) => {
                hey!("Could not redraw the last page, removing its buttons only: {}", e);
                handle.edit(&shown.without_components()).await?;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use serenity::all::CreateEmbed;

    use super::*;
    use crate::discord_helpers::testing::{Call, FakeChannel, FakeInteraction, FakePress};

    fn letters() -> Vec<Page> {
        ["A", "B", "C", "D", "E"].into_iter().map(Page::from).collect()
    }

    fn embeds(count: usize) -> Vec<Page> {
        (1..=count)
            .map(|n| CreateEmbed::new().title(format!("e{n}")).into())
            .collect()
    }

    fn options(per_page: usize) -> PaginatorOptions {
        PaginatorOptions {
            per_page: NonZeroUsize::new(per_page).unwrap(),
            ..Default::default()
        }
    }

    fn titles(chunk: Chunk<'_, Page>) -> Vec<String> {
        let pages: Vec<&Page> = match chunk {
            Chunk::Single(page) => vec![page],
            Chunk::Group(pages) => pages.iter().collect(),
            Chunk::Empty => vec![],
        };
        pages
            .into_iter()
            .map(|page| match page {
                Page::Embed(embed) => serde_json::to_value(embed).unwrap()["title"]
                    .as_str()
                    .unwrap()
                    .to_string(),
                Page::Text(text) => text.clone(),
                other => panic!("unexpected page {other:?}"),
            })
            .collect()
    }

    fn assert_boundaries<F: PageFormatter>(paginator: &Paginator<F>) {
        let controls = paginator.controls();
        assert_eq!(controls.previous_disabled, paginator.current_page() == 0);
        assert_eq!(
            controls.next_disabled,
            paginator.current_page() + 1 >= paginator.max_pages()
        );
    }

    #[test]
    fn max_pages_rounds_up() {
        for count in 0..12 {
            for per_page in 1..6 {
                let paginator = Paginator::new(embeds(count), options(per_page));
                assert_eq!(paginator.max_pages(), count.div_ceil(per_page));
            }
        }
        assert_eq!(Paginator::new(vec![], options(1)).max_pages(), 0);
    }

    #[test]
    fn out_of_range_lookup_resets_to_first_page() {
        let mut paginator = Paginator::new(letters(), options(1));
        assert_eq!(titles(paginator.get_page(3)), vec!["D"]);
        for index in [5, 6, 100, usize::MAX] {
            assert_eq!(titles(paginator.get_page(index)), vec!["A"]);
            assert_eq!(paginator.current_page(), 0);
        }
    }

    #[test]
    fn pages_are_chunked() {
        let mut paginator = Paginator::new(embeds(7), options(5));
        assert_eq!(paginator.max_pages(), 2);
        assert_eq!(titles(paginator.get_page(0)), vec!["e1", "e2", "e3", "e4", "e5"]);
        assert_eq!(titles(paginator.get_page(1)), vec!["e6", "e7"]);
    }

    #[test]
    fn empty_paginator_has_nothing_to_show() {
        let mut paginator = Paginator::new(vec![], options(1));
        assert!(matches!(paginator.get_page(0), Chunk::Empty));
        assert!(matches!(paginator.get_page(7), Chunk::Empty));
        assert_eq!(paginator.current_page(), 0);
        assert!(paginator.controls().previous_disabled);
        assert!(paginator.controls().next_disabled);
    }

    #[tokio::test]
    async fn empty_paginator_shows_placeholder() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(vec![], options(1));
        paginator.start(Invocation::command(&channel)).await.unwrap();
        assert_eq!(channel.log.shown().content.as_deref(), Some(DEFAULT_EMPTY_TEXT));
        assert!(matches!(
            paginator.next_page().await,
            Err(PaginatorError::AtBoundary(Direction::Next))
        ));
    }

    #[tokio::test]
    async fn walks_through_letters() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(letters(), options(1));
        assert_eq!(paginator.max_pages(), 5);

        paginator.start(Invocation::command(&channel)).await.unwrap();
        assert_eq!(channel.log.shown().content.as_deref(), Some("A"));
        assert!(paginator.controls().previous_disabled);
        assert!(!paginator.controls().next_disabled);

        paginator.next_page().await.unwrap();
        assert_eq!(channel.log.shown().content.as_deref(), Some("B"));

        for _ in 0..3 {
            paginator.next_page().await.unwrap();
            assert_boundaries(&paginator);
        }
        assert_eq!(channel.log.shown().content.as_deref(), Some("E"));
        assert!(paginator.controls().next_disabled);
        assert!(!paginator.controls().previous_disabled);

        paginator.previous_page().await.unwrap();
        assert_eq!(channel.log.shown().content.as_deref(), Some("D"));

        // one send, everything after that edits the same message
        let calls = channel.log.calls();
        assert!(matches!(calls[0], Call::Send(_)));
        assert!(calls[1..].iter().all(|call| matches!(call, Call::Edit(1, _))));
    }

    #[tokio::test]
    async fn cannot_walk_past_either_end() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(embeds(5), options(2));
        paginator.start(Invocation::command(&channel)).await.unwrap();
        assert_eq!(paginator.max_pages(), 3);

        assert!(matches!(
            paginator.previous_page().await,
            Err(PaginatorError::AtBoundary(Direction::Previous))
        ));
        paginator.next_page().await.unwrap();
        paginator.next_page().await.unwrap();
        assert_eq!(paginator.current_page(), 2);
        let before = channel.log.calls().len();
        assert!(matches!(
            paginator.next_page().await,
            Err(PaginatorError::AtBoundary(Direction::Next))
        ));
        assert_eq!(channel.log.calls().len(), before);
        assert_eq!(paginator.current_page(), 2);
        assert_eq!(titles(paginator.get_page(2)), vec!["e5"]);
        assert_boundaries(&paginator);
    }

    #[tokio::test]
    async fn button_press_updates_its_own_message() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(letters(), options(1));
        paginator.start(Invocation::command(&channel)).await.unwrap();

        let press = FakePress::new(&channel.log, NEXT_ID);
        paginator
            .navigate_from(Direction::Next, &press)
            .await
            .unwrap();
        assert_eq!(paginator.current_page(), 1);

        let calls = channel.log.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], Call::Update(p) if p.content.as_deref() == Some("B")));

        // a refused press is left for the caller to acknowledge
        let press = FakePress::new(&channel.log, PREVIOUS_ID);
        paginator
            .navigate_from(Direction::Previous, &press)
            .await
            .unwrap();
        assert!(matches!(
            paginator.navigate_from(Direction::Previous, &press).await,
            Err(PaginatorError::AtBoundary(Direction::Previous))
        ));
        assert_eq!(channel.log.calls().len(), 3);
    }

    #[tokio::test]
    async fn boundaries_hold_after_mixed_navigation() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(embeds(9), options(2));
        paginator.start(Invocation::command(&channel)).await.unwrap();

        let moves = [1, 1, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1];
        for step in moves {
            let direction = if step == 1 {
                Direction::Next
            } else {
                Direction::Previous
            };
            let _ = paginator.navigate(direction).await;
            assert!(paginator.current_page() < paginator.max_pages());
            assert_boundaries(&paginator);
        }
    }

    #[tokio::test]
    async fn interaction_start_responds_then_edits() {
        let interaction = FakeInteraction::default();
        let mut paginator = Paginator::new(letters(), options(1));

        let first = paginator
            .start(Invocation::interaction(&interaction))
            .await
            .unwrap();
        paginator.next_page().await.unwrap();
        let second = paginator
            .start(Invocation::interaction(&interaction))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(paginator.source(), Some(Source::Interaction));
        let calls = interaction.log.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], Call::Respond(_)));
        assert!(matches!(calls[2], Call::Edit(1, _)));
        assert_eq!(interaction.log.shown().content.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn answered_interaction_gets_a_follow_up() {
        let interaction = FakeInteraction::default();
        interaction.started.store(true, Ordering::Relaxed);
        let mut paginator = Paginator::new(embeds(3), options(1));
        paginator
            .start(Invocation::interaction(&interaction))
            .await
            .unwrap();
        assert!(matches!(interaction.log.calls()[0], Call::FollowUp(_)));
    }

    #[tokio::test]
    async fn start_needs_exactly_one_context() {
        let channel = FakeChannel::default();
        let interaction = FakeInteraction::default();
        let mut paginator = Paginator::new(letters(), options(1));

        assert!(matches!(
            paginator.start(Invocation::default()).await,
            Err(PaginatorError::InvalidInvocation)
        ));
        assert!(matches!(
            paginator
                .start(Invocation::from_parts(
                    Some(&channel as &dyn CommandContext),
                    Some(&interaction as &dyn InteractionContext),
                ))
                .await,
            Err(PaginatorError::InvalidInvocation)
        ));
        assert!(channel.log.calls().is_empty());

        paginator.start(Invocation::command(&channel)).await.unwrap();
        assert!(matches!(
            paginator.start(Invocation::interaction(&interaction)).await,
            Err(PaginatorError::InvalidInvocation)
        ));
        assert_eq!(paginator.source(), Some(Source::Command));
    }

    #[tokio::test]
    async fn navigation_needs_a_running_paginator() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(letters(), options(1));
        assert!(matches!(
            paginator.next_page().await,
            Err(PaginatorError::NotStarted)
        ));

        paginator.start(Invocation::command(&channel)).await.unwrap();
        assert!(paginator.stop().is_some());
        assert!(paginator.is_stopped());
        assert_eq!(paginator.message_id(), None);
        assert_eq!(paginator.source(), None);
        assert!(matches!(
            paginator.next_page().await,
            Err(PaginatorError::Stopped)
        ));
        assert!(matches!(
            paginator.start(Invocation::command(&channel)).await,
            Err(PaginatorError::Stopped)
        ));
    }

    #[tokio::test]
    async fn close_removes_buttons() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(letters(), options(1));
        paginator.start(Invocation::command(&channel)).await.unwrap();
        paginator.next_page().await.unwrap();
        paginator.close().await.unwrap();

        let shown = channel.log.shown();
        assert_eq!(shown.content.as_deref(), Some("B"));
        assert_eq!(shown.components.map(|rows| rows.len()), Some(0));

        // closing twice is harmless
        paginator.close().await.unwrap();
        assert_eq!(channel.log.calls().len(), 3);
    }

    #[tokio::test]
    async fn close_can_delete_the_message() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::new(
            letters(),
            PaginatorOptions {
                delete_message_after: true,
                ..Default::default()
            },
        );
        paginator.start(Invocation::command(&channel)).await.unwrap();
        paginator.close().await.unwrap();
        assert!(matches!(channel.log.calls().last(), Some(Call::Delete(1))));
    }

    #[tokio::test]
    async fn bad_page_does_not_move_the_paginator() {
        let channel = FakeChannel::default();
        let pages = vec![
            Page::from("fine"),
            Page::List(vec![CreateEmbed::new().title("ok").into(), "text".into()]),
        ];
        let mut paginator = Paginator::new(pages, options(1));
        paginator.start(Invocation::command(&channel)).await.unwrap();

        assert!(matches!(
            paginator.next_page().await,
            Err(PaginatorError::InvalidPageFormat { index: 1, .. })
        ));
        assert_eq!(paginator.current_page(), 0);
        assert_eq!(channel.log.calls().len(), 1);
    }

    struct Numbered;

    #[async_trait]
    impl PageFormatter for Numbered {
        type Item = u32;

        async fn format_page(&self, chunk: Chunk<'_, u32>) -> Result<Page, PaginatorError> {
            let numbers: Vec<String> = match chunk {
                Chunk::Single(n) => vec![n.to_string()],
                Chunk::Group(ns) => ns.iter().map(u32::to_string).collect(),
                Chunk::Empty => vec![],
            };
            Ok(Page::Text(numbers.join(", ")))
        }
    }

    #[tokio::test]
    async fn custom_formatter_shapes_pages() {
        let channel = FakeChannel::default();
        let mut paginator = Paginator::with_formatter((1..=5).collect(), Numbered, options(2));
        paginator.start(Invocation::command(&channel)).await.unwrap();
        assert_eq!(channel.log.shown().content.as_deref(), Some("1, 2"));
        paginator.next_page().await.unwrap();
        paginator.next_page().await.unwrap();
        assert_eq!(channel.log.shown().content.as_deref(), Some("5"));
    }

    /// Formats like [`AsIs`] until it is told to break.
    struct Breakable {
        broken: Arc<AtomicBool>,
    }

    #[async_trait]
    impl PageFormatter for Breakable {
        type Item = Page;

        async fn format_page(&self, chunk: Chunk<'_, Page>) -> Result<Page, PaginatorError> {
            if self.broken.load(Ordering::Relaxed) {
                return Err(PaginatorError::InvalidPageFormat {
                    index: 0,
                    found: "text",
                });
            }
            AsIs::default().format_page(chunk).await
        }
    }

    #[tokio::test]
    async fn close_strips_buttons_even_if_the_page_breaks() {
        let channel = FakeChannel::default();
        let broken = Arc::new(AtomicBool::new(false));
        let formatter = Breakable {
            broken: Arc::clone(&broken),
        };
        let mut paginator = Paginator::with_formatter(letters(), formatter, options(1));
        paginator.start(Invocation::command(&channel)).await.unwrap();
        paginator.next_page().await.unwrap();

        broken.store(true, Ordering::Relaxed);
        assert!(matches!(
            paginator.close().await,
            Err(PaginatorError::InvalidPageFormat { .. })
        ));
        assert!(paginator.is_stopped());

        let shown = channel.log.shown();
        assert_eq!(shown.content.as_deref(), Some("B"));
        assert_eq!(shown.components.map(|rows| rows.len()), Some(0));
    }
}
