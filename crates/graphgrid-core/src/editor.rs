//! Interaction state machine: turns pointer events into scene edits.

use crate::config::EditorConfig;
use crate::geometry::{self, EdgeGeometry, GeometryParams};
use crate::hit::{ApproxTextMetrics, SpatialQuery, TextMetrics};
use crate::input::{InputState, Modifiers, MouseButton, PointerEvent};
use crate::model::{EdgeId, ElementId, ElementKind, ElementRef};
use crate::prompt::{PromptRequest, Prompter};
use crate::scene::{Scene, SceneError};
use crate::snap::SnapGuides;
use crate::viewport::{Viewport, ZoomDirection};
use kurbo::{Line, Point};
use std::time::Instant;

/// Observable interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Panning,
    DraggingElement(ElementRef),
    DrawingEdge(ElementRef),
    TextPlacementArmed,
}

/// What an event changed, for hosts that refresh lists or redraw selectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    VertexCreated(ElementId),
    TextCreated(ElementId),
    EdgeCreated(EdgeId),
    ElementMoved(ElementRef),
    TextEdited(ElementId),
    ViewChanged,
    TextModeChanged(bool),
}

/// Gesture in progress between a press and its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    /// Press on empty canvas; a release in place creates a vertex.
    Click,
    /// Press while text placement is armed.
    PlaceText,
    Panning,
    Dragging(ElementRef),
    DrawingEdge(ElementRef),
}

/// Owns the scene and one view of it, and interprets pointer input.
pub struct Editor {
    scene: Scene,
    viewport: Viewport,
    config: EditorConfig,
    input: InputState,
    gesture: Gesture,
    text_mode: bool,
    guides: SnapGuides,
    metrics: Box<dyn TextMetrics>,
}

impl Editor {
    pub fn new(scene: Scene, config: EditorConfig) -> Self {
        Self {
            viewport: config.viewport(),
            input: InputState::new(config.double_click_window(), config.click_slop),
            scene,
            config,
            gesture: Gesture::Idle,
            text_mode: false,
            guides: SnapGuides::default(),
            metrics: Box::new(ApproxTextMetrics::default()),
        }
    }

    /// Use a real font backend for text hit-testing.
    pub fn with_metrics(mut self, metrics: Box<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn metrics(&self) -> &dyn TextMetrics {
        self.metrics.as_ref()
    }

    pub fn guides(&self) -> &SnapGuides {
        &self.guides
    }

    /// Pointer position in world coordinates.
    pub fn pointer_world(&self) -> Point {
        self.input.world
    }

    pub fn state(&self) -> InteractionState {
        match self.gesture {
            Gesture::Panning => InteractionState::Panning,
            Gesture::Dragging(element) => InteractionState::DraggingElement(element),
            Gesture::DrawingEdge(element) => InteractionState::DrawingEdge(element),
            Gesture::Idle | Gesture::Click | Gesture::PlaceText if self.text_mode => {
                InteractionState::TextPlacementArmed
            }
            Gesture::Idle | Gesture::Click | Gesture::PlaceText => InteractionState::Idle,
        }
    }

    pub fn is_text_mode(&self) -> bool {
        self.text_mode
    }

    /// Arm or disarm text placement. Returns the new state.
    pub fn toggle_text_mode(&mut self) -> bool {
        self.text_mode = !self.text_mode;
        log::debug!("text placement {}", if self.text_mode { "armed" } else { "disarmed" });
        self.text_mode
    }

    /// Element being dragged, for highlighting.
    pub fn dragged_element(&self) -> Option<ElementRef> {
        match self.gesture {
            Gesture::Dragging(element) => Some(element),
            _ => None,
        }
    }

    /// Start element of the edge being drawn, for highlighting.
    pub fn edge_start(&self) -> Option<ElementRef> {
        match self.gesture {
            Gesture::DrawingEdge(element) => Some(element),
            _ => None,
        }
    }

    /// Segment from the edge start element to the pointer.
    pub fn edge_preview(&self) -> Option<Line> {
        let start = self.edge_start()?;
        let from = self.scene.active().resolve(start)?.position();
        Some(Line::new(from, self.input.world))
    }

    /// World-space drawing sizes at the current zoom.
    pub fn geometry_params(&self) -> GeometryParams {
        GeometryParams::for_scale(&self.config, self.viewport.scale())
    }

    /// Geometry of every drawable edge in the active diagram.
    pub fn plan_edges(&self) -> Vec<EdgeGeometry> {
        geometry::plan_diagram_edges(self.scene.active(), &self.geometry_params())
    }

    /// Abandon any gesture in progress without applying it.
    pub fn cancel_gesture(&mut self) {
        if self.gesture != Gesture::Idle {
            log::debug!("cancelling gesture {:?}", self.gesture);
        }
        self.gesture = Gesture::Idle;
        self.input.is_down = false;
        self.guides.clear();
    }

    pub fn switch_diagram(&mut self, index: usize) -> Result<(), SceneError> {
        self.cancel_gesture();
        self.scene.switch_diagram(index)
    }

    pub fn add_diagram(&mut self) -> usize {
        self.cancel_gesture();
        self.scene.add_diagram()
    }

    pub fn delete_diagram(&mut self, index: usize) -> Result<(), SceneError> {
        self.cancel_gesture();
        self.scene.delete_diagram(index).map(|_| ())
    }

    /// Handle one pointer event at the current time.
    pub async fn handle_event(
        &mut self,
        event: PointerEvent,
        prompter: &dyn Prompter,
    ) -> Vec<EditorAction> {
        self.handle_event_at(event, Instant::now(), prompter).await
    }

    /// Handle one pointer event that happened at `now`.
    pub async fn handle_event_at(
        &mut self,
        event: PointerEvent,
        now: Instant,
        prompter: &dyn Prompter,
    ) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position, &mut actions),
            PointerEvent::Up {
                position,
                button,
                modifiers,
            } => {
                if button == MouseButton::Right {
                    return actions;
                }
                let clicked = self
                    .pointer_up(position, modifiers, prompter, &mut actions)
                    .await;
                if clicked && self.input.register_click(now) {
                    self.double_click(modifiers, prompter, &mut actions).await;
                }
            }
            PointerEvent::Leave { position } => {
                let modifiers = self.input.modifiers;
                self.pointer_up(position, modifiers, prompter, &mut actions)
                    .await;
                self.input.reset_clicks();
            }
            PointerEvent::Wheel { position, delta } => {
                self.viewport
                    .zoom_at(position, ZoomDirection::from_wheel_delta(delta.y));
                self.input.track(position, self.viewport.to_world(position));
                actions.push(EditorAction::ViewChanged);
            }
        }
        actions
    }

    fn element_at(&self, world: Point) -> Option<ElementRef> {
        SpatialQuery::new(
            self.scene.active(),
            &self.viewport,
            self.config.vertex_radius,
            self.metrics.as_ref(),
        )
        .connectable_at(world)
        .map(|c| c.element_ref())
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        if button == MouseButton::Right {
            return;
        }
        let world = self.viewport.to_world(position);
        self.input.press(position, world, modifiers);
        self.guides.clear();

        self.gesture = if button == MouseButton::Middle || modifiers.alt {
            Gesture::Panning
        } else if self.text_mode {
            Gesture::PlaceText
        } else {
            match self.element_at(world) {
                Some(element) if modifiers.shift => Gesture::DrawingEdge(element),
                Some(element) => {
                    self.guides = SnapGuides::compute(
                        self.scene.diagrams(),
                        self.scene.active_index(),
                        Some(element),
                    );
                    Gesture::Dragging(element)
                }
                None if modifiers.shift => Gesture::Idle,
                None => Gesture::Click,
            }
        };
        log::trace!("pointer down at {world:?}: {:?}", self.gesture);
    }

    fn pointer_move(&mut self, position: Point, actions: &mut Vec<EditorAction>) {
        let world = self.viewport.to_world(position);
        let delta = self.input.track(position, world);
        if !self.input.is_down {
            return;
        }
        match self.gesture {
            Gesture::Panning => {
                self.viewport.pan(delta);
                self.input.world = self.viewport.to_world(position);
                actions.push(EditorAction::ViewChanged);
            }
            Gesture::Dragging(element) => {
                let tolerance = self.config.snap_threshold / self.viewport.scale();
                let snapped = self.guides.snap(world, tolerance);
                if self.scene.active_mut().set_position(element, snapped.point) {
                    self.scene.mark_dirty();
                    actions.push(EditorAction::ElementMoved(element));
                } else {
                    log::warn!("dragged element {element:?} disappeared");
                    self.cancel_gesture();
                }
            }
            _ => {}
        }
    }

    /// Returns true when the release completes a click (press and release in place).
    async fn pointer_up(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        prompter: &dyn Prompter,
        actions: &mut Vec<EditorAction>,
    ) -> bool {
        let world = self.viewport.to_world(position);
        if !self.input.release(position, world, modifiers) {
            return false;
        }
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        self.guides.clear();
        let in_place = self.input.within_slop(self.config.click_slop);

        match gesture {
            Gesture::Panning => return false,
            Gesture::DrawingEdge(start) => {
                if let Some(end) = self.element_at(world).filter(|end| end.id != start.id) {
                    self.create_edge(start.id, end.id, actions);
                }
            }
            Gesture::PlaceText => self.place_text(world, prompter, actions).await,
            Gesture::Click => {
                if in_place && !modifiers.shift && self.element_at(world).is_none() {
                    let id = self.scene.active_mut().add_vertex(world);
                    self.scene.mark_dirty();
                    actions.push(EditorAction::VertexCreated(id));
                }
            }
            Gesture::Dragging(_) | Gesture::Idle => {}
        }
        in_place
    }

    async fn place_text(
        &mut self,
        world: Point,
        prompter: &dyn Prompter,
        actions: &mut Vec<EditorAction>,
    ) {
        let answer = prompter.prompt(&PromptRequest::NewText).await;
        if let Some(text) = answer.filter(|text| !text.is_empty()) {
            let id = self.scene.active_mut().add_text_node(world, text);
            self.scene.mark_dirty();
            actions.push(EditorAction::TextCreated(id));
        }
        self.text_mode = false;
        actions.push(EditorAction::TextModeChanged(false));
    }

    fn create_edge(&mut self, from: ElementId, to: ElementId, actions: &mut Vec<EditorAction>) {
        match self.scene.active_mut().add_edge(from, to) {
            Ok(id) => {
                self.scene.mark_dirty();
                actions.push(EditorAction::EdgeCreated(id));
            }
            Err(e) => log::warn!("could not create edge: {e}"),
        }
    }

    async fn double_click(
        &mut self,
        modifiers: Modifiers,
        prompter: &dyn Prompter,
        actions: &mut Vec<EditorAction>,
    ) {
        let Some(element) = self.element_at(self.input.world) else {
            return;
        };
        match element.kind {
            ElementKind::Vertex if modifiers.shift => {
                self.create_edge(element.id, element.id, actions);
            }
            ElementKind::TextNode if !modifiers.shift => {
                let current = match self.scene.active().text_node(element.id) {
                    Some(node) => node.text.clone(),
                    None => return,
                };
                let request = PromptRequest::EditText { current };
                if let Some(text) = prompter.prompt(&request).await {
                    if let Some(node) = self.scene.active_mut().text_node_mut(element.id) {
                        node.text = text;
                        self.scene.mark_dirty();
                        actions.push(EditorAction::TextEdited(element.id));
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use crate::model::{EdgeDirection, LoopPosition, VertexShape};
    use crate::prompt::ScriptedPrompter;
    use kurbo::Vec2;
    use std::time::Duration;

    struct Harness {
        editor: Editor,
        prompter: ScriptedPrompter,
        clock: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                editor: Editor::new(Scene::default(), EditorConfig::default()),
                prompter: ScriptedPrompter::new(),
                clock: Instant::now(),
            }
        }

        fn send(&mut self, event: PointerEvent) -> Vec<EditorAction> {
            // Events are spaced far enough apart to never form double clicks.
            self.clock += Duration::from_secs(1);
            block_on(self.editor.handle_event_at(event, self.clock, &self.prompter))
        }

        fn send_quick(&mut self, event: PointerEvent) -> Vec<EditorAction> {
            self.clock += Duration::from_millis(50);
            block_on(self.editor.handle_event_at(event, self.clock, &self.prompter))
        }

        fn click(&mut self, x: f64, y: f64) -> Vec<EditorAction> {
            self.send(PointerEvent::down((x, y)));
            self.send(PointerEvent::up((x, y)))
        }

        fn vertex(&mut self, x: f64, y: f64) -> ElementId {
            self.editor.scene_mut().active_mut().add_vertex(Point::new(x, y))
        }
    }

    #[test]
    fn test_click_creates_vertex() {
        let mut h = Harness::new();
        let actions = h.click(100.0, 100.0);
        assert_eq!(actions, vec![EditorAction::VertexCreated(1)]);
        let vertex = h.editor.scene().active().vertex(1).unwrap();
        assert_eq!(vertex.position(), Point::new(100.0, 100.0));
        assert_eq!(vertex.shape, VertexShape::Circle);
        assert_eq!(vertex.label, "");
        assert_eq!(vertex.color, None);
        assert_eq!(h.editor.state(), InteractionState::Idle);
    }

    #[test]
    fn test_click_uses_world_coordinates() {
        let mut h = Harness::new();
        h.editor.viewport_mut().offset = Vec2::new(50.0, 50.0);
        h.editor.viewport_mut().set_scale(2.0);
        h.click(150.0, 250.0);
        assert_eq!(
            h.editor.scene().active().vertex(1).unwrap().position(),
            Point::new(50.0, 100.0)
        );
    }

    #[test]
    fn test_click_on_vertex_creates_nothing() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        assert!(h.click(5.0, 5.0).is_empty());
        assert_eq!(h.editor.scene().active().vertices.len(), 1);
    }

    #[test]
    fn test_press_drag_release_on_empty_creates_nothing() {
        let mut h = Harness::new();
        h.send(PointerEvent::down((0.0, 0.0)));
        h.send(PointerEvent::moved((40.0, 0.0)));
        assert!(h.send(PointerEvent::up((40.0, 0.0))).is_empty());
        assert!(h.editor.scene().active().vertices.is_empty());
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut h = Harness::new();
        assert!(h.send(PointerEvent::up((10.0, 10.0))).is_empty());
        assert!(h.editor.scene().active().vertices.is_empty());
    }

    #[test]
    fn test_right_button_ignored() {
        let mut h = Harness::new();
        let down = PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
            modifiers: Modifiers::NONE,
        };
        let up = PointerEvent::Up {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
            modifiers: Modifiers::NONE,
        };
        h.send(down);
        assert!(h.send(up).is_empty());
        assert!(h.editor.scene().active().vertices.is_empty());
    }

    #[test]
    fn test_shift_drag_creates_edge() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        h.vertex(100.0, 0.0);
        h.send(PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT));
        assert_eq!(
            h.editor.state(),
            InteractionState::DrawingEdge(ElementRef::vertex(1))
        );
        h.send(PointerEvent::moved((60.0, 10.0)));
        let preview = h.editor.edge_preview().unwrap();
        assert_eq!(preview.p0, Point::new(0.0, 0.0));
        assert_eq!(preview.p1, Point::new(60.0, 10.0));

        let actions = h.send(PointerEvent::up((100.0, 0.0)).with_modifiers(Modifiers::SHIFT));
        assert_eq!(actions, vec![EditorAction::EdgeCreated(1)]);
        let edge = h.editor.scene().active().edge(1).unwrap();
        assert_eq!((edge.from, edge.to, edge.bend), (1, 2, 0.0));
        assert_eq!(edge.direction, EdgeDirection::Undirected);
        assert!(h.editor.edge_preview().is_none());
    }

    #[test]
    fn test_edge_to_empty_space_or_self_cancels() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        h.send(PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT));
        assert!(h.send(PointerEvent::up((300.0, 300.0))).is_empty());
        h.send(PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT));
        assert!(h.send(PointerEvent::up((2.0, 2.0))).is_empty());
        assert!(h.editor.scene().active().edges.is_empty());
        assert!(h.editor.scene().active().vertices.len() == 1);
    }

    #[test]
    fn test_edge_to_text_node() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        let text = h
            .editor
            .scene_mut()
            .active_mut()
            .add_text_node(Point::new(200.0, 0.0), "label");
        h.send(PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT));
        h.send(PointerEvent::up((200.0, 0.0)));
        let edge = h.editor.scene().active().edge(1).unwrap();
        assert_eq!(edge.to, text);
    }

    #[test]
    fn test_shift_double_click_creates_self_loop() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        let shift_down = PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT);
        let shift_up = PointerEvent::up((0.0, 0.0)).with_modifiers(Modifiers::SHIFT);
        h.send(shift_down);
        assert!(h.send_quick(shift_up).is_empty());
        h.send_quick(shift_down);
        let actions = h.send_quick(shift_up);
        assert_eq!(actions, vec![EditorAction::EdgeCreated(1)]);
        let edge = h.editor.scene().active().edge(1).unwrap();
        assert_eq!((edge.from, edge.to), (1, 1));
        assert_eq!(edge.loop_position, Some(LoopPosition::Above));
    }

    #[test]
    fn test_slow_clicks_are_not_double() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        let shift_down = PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT);
        let shift_up = PointerEvent::up((0.0, 0.0)).with_modifiers(Modifiers::SHIFT);
        for _ in 0..2 {
            h.send(shift_down);
            h.send(shift_up);
        }
        assert!(h.editor.scene().active().edges.is_empty());
    }

    #[test]
    fn test_double_click_edits_text() {
        let mut h = Harness::new();
        h.editor
            .scene_mut()
            .active_mut()
            .add_text_node(Point::new(50.0, 50.0), "old");
        h.prompter.push(Some("new".to_string()));
        h.send(PointerEvent::down((50.0, 50.0)));
        h.send_quick(PointerEvent::up((50.0, 50.0)));
        h.send_quick(PointerEvent::down((50.0, 50.0)));
        let actions = h.send_quick(PointerEvent::up((50.0, 50.0)));
        assert_eq!(actions, vec![EditorAction::TextEdited(1)]);
        assert_eq!(h.editor.scene().active().text_node(1).unwrap().text, "new");
        assert_eq!(
            h.prompter.requests(),
            vec![PromptRequest::EditText {
                current: "old".into()
            }]
        );
    }

    #[test]
    fn test_abandoned_text_edit_keeps_text() {
        let mut h = Harness::new();
        h.editor
            .scene_mut()
            .active_mut()
            .add_text_node(Point::new(50.0, 50.0), "old");
        h.send(PointerEvent::down((50.0, 50.0)));
        h.send_quick(PointerEvent::up((50.0, 50.0)));
        h.send_quick(PointerEvent::down((50.0, 50.0)));
        assert!(h.send_quick(PointerEvent::up((50.0, 50.0))).is_empty());
        assert_eq!(h.editor.scene().active().text_node(1).unwrap().text, "old");
    }

    #[test]
    fn test_drag_moves_element_with_snapping() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        h.vertex(200.0, 0.0);
        h.vertex(300.0, 300.0);
        h.send(PointerEvent::down((300.0, 300.0)));
        assert_eq!(
            h.editor.state(),
            InteractionState::DraggingElement(ElementRef::vertex(3))
        );
        assert!(h.editor.guides().is_active());

        // Near the midpoint (100, 0) of vertices 1 and 2.
        let actions = h.send(PointerEvent::moved((104.0, 3.0)));
        assert_eq!(actions, vec![EditorAction::ElementMoved(ElementRef::vertex(3))]);
        assert_eq!(
            h.editor.scene().active().vertex(3).unwrap().position(),
            Point::new(100.0, 0.0)
        );

        // Only the x axis matches here.
        h.send(PointerEvent::moved((197.0, 150.0)));
        assert_eq!(
            h.editor.scene().active().vertex(3).unwrap().position(),
            Point::new(200.0, 150.0)
        );

        h.send(PointerEvent::up((197.0, 150.0)));
        assert!(!h.editor.guides().is_active());
        assert_eq!(h.editor.state(), InteractionState::Idle);
        assert_eq!(h.editor.scene().active().vertices.len(), 3);
    }

    #[test]
    fn test_alt_drag_pans() {
        let mut h = Harness::new();
        h.send(PointerEvent::down((10.0, 10.0)).with_modifiers(Modifiers::ALT));
        assert_eq!(h.editor.state(), InteractionState::Panning);
        h.send(PointerEvent::moved((30.0, 15.0)));
        h.send(PointerEvent::moved((40.0, 25.0)));
        assert_eq!(h.editor.viewport().offset, Vec2::new(30.0, 15.0));
        assert!(h.send(PointerEvent::up((40.0, 25.0))).is_empty());
        assert!(h.editor.scene().active().vertices.is_empty());
    }

    #[test]
    fn test_middle_button_pans_and_ends_without_creating() {
        let mut h = Harness::new();
        let down = PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Middle,
            modifiers: Modifiers::NONE,
        };
        let up = PointerEvent::Up {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Middle,
            modifiers: Modifiers::NONE,
        };
        h.send(down);
        assert_eq!(h.editor.state(), InteractionState::Panning);
        assert!(h.send(up).is_empty());
        assert!(h.editor.scene().active().vertices.is_empty());
    }

    #[test]
    fn test_leave_acts_as_release() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        h.vertex(100.0, 0.0);
        h.send(PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT));
        let actions = h.send(PointerEvent::Leave {
            position: Point::new(100.0, 0.0),
        });
        assert_eq!(actions, vec![EditorAction::EdgeCreated(1)]);
        assert_eq!(h.editor.state(), InteractionState::Idle);
        assert!(h.send(PointerEvent::Leave { position: Point::ZERO }).is_empty());
    }

    #[test]
    fn test_text_placement() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        assert!(h.editor.toggle_text_mode());
        assert_eq!(h.editor.state(), InteractionState::TextPlacementArmed);

        h.prompter.push(Some("hello".to_string()));
        // Pressing on a vertex while armed places text instead of dragging.
        h.send(PointerEvent::down((0.0, 0.0)));
        assert_eq!(h.editor.state(), InteractionState::TextPlacementArmed);
        let actions = h.send(PointerEvent::up((0.0, 0.0)));
        assert_eq!(
            actions,
            vec![EditorAction::TextCreated(2), EditorAction::TextModeChanged(false)]
        );
        assert_eq!(h.editor.scene().active().text_node(2).unwrap().text, "hello");
        assert!(!h.editor.is_text_mode());
        assert_eq!(h.prompter.requests(), vec![PromptRequest::NewText]);
    }

    #[test]
    fn test_dismissed_or_empty_text_disarms() {
        let mut h = Harness::new();
        h.editor.toggle_text_mode();
        h.click(10.0, 10.0);
        assert!(!h.editor.is_text_mode());

        h.editor.toggle_text_mode();
        h.prompter.push(Some(String::new()));
        h.click(10.0, 10.0);
        assert!(!h.editor.is_text_mode());
        assert!(h.editor.scene().active().text_nodes.is_empty());
        assert!(h.editor.scene().active().vertices.is_empty());
    }

    #[test]
    fn test_wheel_zoom_keeps_pointer_fixed() {
        let mut h = Harness::new();
        let cursor = Point::new(200.0, 120.0);
        let before = h.editor.viewport().to_world(cursor);
        let actions = h.send(PointerEvent::Wheel {
            position: cursor,
            delta: Vec2::new(0.0, -1.0),
        });
        assert_eq!(actions, vec![EditorAction::ViewChanged]);
        assert!((h.editor.viewport().scale() - 1.1).abs() < 1e-12);
        assert!((h.editor.viewport().to_world(cursor) - before).hypot() < 1e-9);
    }

    #[test]
    fn test_switch_diagram_cancels_gesture() {
        let mut h = Harness::new();
        h.vertex(0.0, 0.0);
        h.send(PointerEvent::down((0.0, 0.0)));
        h.editor.add_diagram();
        assert_eq!(h.editor.state(), InteractionState::Idle);
        assert!(h.send(PointerEvent::up((0.0, 0.0))).is_empty());
        assert_eq!(h.editor.scene().active().name, "Graph 2");
        assert!(h.editor.scene().active().vertices.is_empty());
    }
}
