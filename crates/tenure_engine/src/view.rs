//! The document-view capability the pipeline reads from.
//!
//! The pipeline never touches a global document. It is handed a [`DocumentView`]
//! and asks it for elements by query string, reads their text and attributes,
//! and activates controls. [`SnapshotView`] is a `scraper`-backed view that
//! replays recorded HTML snapshots.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use tenure_logging::tenure_debug;

/// One element of a view. Handles are owned and stay readable after the view
/// moves on.
pub trait ViewElement: Clone + 'static {
    fn select_all(&self, query: &str) -> Vec<Self>;

    fn select_first(&self, query: &str) -> Option<Self> {
        self.select_all(query).into_iter().next()
    }

    /// Descendant text with whitespace collapsed to single spaces.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

#[async_trait::async_trait(?Send)]
pub trait DocumentView {
    type Element: ViewElement;

    fn query_all(&self, query: &str) -> Vec<Self::Element>;

    fn query_first(&self, query: &str) -> Option<Self::Element> {
        self.query_all(query).into_iter().next()
    }

    /// Address of the document, when the view knows it.
    fn location(&self) -> Option<String> {
        None
    }

    /// Click/expand a control. Content may change once this returns.
    async fn activate(&mut self, control: &Self::Element);
}

/// Opens member profiles in isolated sub-views.
///
/// Every view handed out by `open` must be passed back to `close`, which
/// [`OpenProfile`] does on drop.
#[async_trait::async_trait(?Send)]
pub trait ProfileViewer {
    type View: DocumentView;

    async fn open(&mut self, profile_ref: &str) -> Option<Self::View>;

    fn close(&mut self, view: Self::View);
}

/// An opened sub-view that is handed back to its viewer when dropped.
pub struct OpenProfile<'a, P: ProfileViewer> {
    viewer: &'a mut P,
    view: Option<P::View>,
}

impl<'a, P: ProfileViewer> OpenProfile<'a, P> {
    pub fn new(viewer: &'a mut P, view: P::View) -> Self {
        Self {
            viewer,
            view: Some(view),
        }
    }

    pub fn view(&self) -> Option<&P::View> {
        self.view.as_ref()
    }
}

impl<P: ProfileViewer> Drop for OpenProfile<'_, P> {
    fn drop(&mut self) {
        if let Some(view) = self.view.take() {
            self.viewer.close(view);
        }
    }
}

fn parse_query(query: &str) -> Option<Selector> {
    match Selector::parse(query) {
        Ok(selector) => Some(selector),
        Err(err) => {
            tenure_debug!("Ignoring unparseable query {:?}: {:?}", query, err);
            None
        }
    }
}

fn collapse_whitespace<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Element handle into one parsed snapshot.
#[derive(Clone)]
pub struct HtmlElement {
    doc: Rc<Html>,
    id: NodeId,
}

impl HtmlElement {
    fn with_ref<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        self.doc.tree.get(self.id).and_then(ElementRef::wrap).map(f)
    }
}

impl fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlElement").field("id", &self.id).finish()
    }
}

impl ViewElement for HtmlElement {
    fn select_all(&self, query: &str) -> Vec<Self> {
        let Some(selector) = parse_query(query) else {
            return Vec::new();
        };
        let ids = self
            .with_ref(|el| el.select(&selector).map(|found| found.id()).collect::<Vec<_>>())
            .unwrap_or_default();
        ids.into_iter()
            .map(|id| HtmlElement {
                doc: Rc::clone(&self.doc),
                id,
            })
            .collect()
    }

    fn text(&self) -> String {
        self.with_ref(|el| collapse_whitespace(el.text()))
            .unwrap_or_default()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.with_ref(|el| el.value().attr(name).map(str::to_string))
            .flatten()
    }
}

/// Replays an ordered list of HTML snapshots.
///
/// Each activation advances to the next snapshot and stays on the last one
/// once exhausted.
pub struct SnapshotView {
    snapshots: Vec<Rc<Html>>,
    current: usize,
    location: Option<String>,
    activations: usize,
}

impl SnapshotView {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut snapshots: Vec<Rc<Html>> = pages
            .into_iter()
            .map(|page| Rc::new(Html::parse_document(page.as_ref())))
            .collect();
        if snapshots.is_empty() {
            snapshots.push(Rc::new(Html::parse_document("")));
        }
        Self {
            snapshots,
            current: 0,
            location: None,
            activations: 0,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn current_snapshot(&self) -> usize {
        self.current
    }

    pub fn activations(&self) -> usize {
        self.activations
    }

    fn document(&self) -> &Rc<Html> {
        &self.snapshots[self.current]
    }
}

#[async_trait::async_trait(?Send)]
impl DocumentView for SnapshotView {
    type Element = HtmlElement;

    fn query_all(&self, query: &str) -> Vec<HtmlElement> {
        let Some(selector) = parse_query(query) else {
            return Vec::new();
        };
        let doc = self.document();
        doc.select(&selector)
            .map(|found| HtmlElement {
                doc: Rc::clone(doc),
                id: found.id(),
            })
            .collect()
    }

    fn location(&self) -> Option<String> {
        self.location.clone()
    }

    async fn activate(&mut self, _control: &HtmlElement) {
        self.activations += 1;
        if self.current + 1 < self.snapshots.len() {
            self.current += 1;
        }
        tenure_debug!(
            "Snapshot view activated: now on snapshot {} of {}",
            self.current + 1,
            self.snapshots.len()
        );
    }
}

/// Serves recorded profile pages keyed by the last path segment of the
/// profile reference (`https://host/in/jane-doe/` -> `jane-doe`).
#[derive(Debug, Default)]
pub struct SnapshotProfileViewer {
    pages: HashMap<String, String>,
    opened: usize,
    closed: usize,
}

impl SnapshotProfileViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slug: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(slug.into(), html.into());
    }

    pub fn opened(&self) -> usize {
        self.opened
    }

    /// Sub-views handed out and not yet closed.
    pub fn open_views(&self) -> usize {
        self.opened - self.closed
    }
}

pub fn profile_slug(profile_ref: &str) -> &str {
    let trimmed = profile_ref.split(['?', '#']).next().unwrap_or(profile_ref);
    trimmed
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
}

#[async_trait::async_trait(?Send)]
impl ProfileViewer for SnapshotProfileViewer {
    type View = SnapshotView;

    async fn open(&mut self, profile_ref: &str) -> Option<SnapshotView> {
        let html = self.pages.get(profile_slug(profile_ref))?;
        self.opened += 1;
        Some(SnapshotView::new([html]).with_location(profile_ref))
    }

    fn close(&mut self, _view: SnapshotView) {
        self.closed += 1;
    }
}

/// Viewer for card-only runs; never opens anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProfileViewer;

#[async_trait::async_trait(?Send)]
impl ProfileViewer for NoProfileViewer {
    type View = SnapshotView;

    async fn open(&mut self, _profile_ref: &str) -> Option<SnapshotView> {
        None
    }

    fn close(&mut self, _view: SnapshotView) {}
}
