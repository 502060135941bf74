//! Scene manager: the single entry point of the engine
//!
//! Owns the scene graph, the visual object index, the resource registry,
//! the camera and the animation loop, plus the host and render backend it
//! was created with. Every public operation is synchronous; frame callbacks
//! arrive through [`SceneManager::on_frame`].

use std::collections::HashSet;

use thiserror::Error;

use crate::animation::{default_rng, AnimationLoop, FlickerRng, LoopState};
use crate::config::EngineConfig;
use crate::domain::{Device, DeviceKind, HouseSnapshot, Room, RoomKind};
use crate::events::SceneEvent;
use crate::foundation::math::{Point3, Vec3};
use crate::input::{pointer_ray, raycast, resolve, DragEvent, DragTargetResolver, HitResult, PickPolicy, PointerEvent, Rect};
use crate::platform::{DomEvent, DomEventKind, EventResponse, FrameHandle, Host, ListenerRegistry, ListenerTarget};
use crate::render::{Camera, Color, DrawList, RenderBackend, ResourceRegistry};
use crate::scene::{apply_light_state, NodeKind, ObjectIdentity, ObjectKind, SceneBuilder, SceneGraph, VisualObjectIndex};

/// Scene manager errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The host has no container to mount the drawing surface in
    #[error("mounting container is missing")]
    MissingContainer,
}

/// Listeners installed by [`SceneManager::setup_drag_and_drop`]
const DRAG_LISTENERS: [(ListenerTarget, DomEventKind); 4] = [
    (ListenerTarget::Container, DomEventKind::DragOver),
    (ListenerTarget::Container, DomEventKind::Drop),
    (ListenerTarget::Container, DomEventKind::DragLeave),
    (ListenerTarget::Document, DomEventKind::DragEnd),
];

/// Keeps a rendered house in step with device state and handles interaction
pub struct SceneManager<H: Host, R: RenderBackend> {
    config: EngineConfig,
    host: H,
    renderer: R,
    camera: Camera,
    graph: SceneGraph,
    index: VisualObjectIndex,
    resources: ResourceRegistry,
    drag: DragTargetResolver,
    animation: AnimationLoop,
    listeners: ListenerRegistry,
    rng: Box<dyn FlickerRng>,
    overloaded: bool,
    disposed: bool,
}

impl<H: Host, R: RenderBackend> SceneManager<H, R> {
    /// Create the scene inside the host's container
    ///
    /// Mounts the drawing surface, sets up background and scene lighting and
    /// starts listening for window resizes.
    ///
    /// # Errors
    /// [`SceneError::MissingContainer`] if the host has no container.
    pub fn new(config: EngineConfig, mut host: H, mut renderer: R) -> Result<Self, SceneError> {
        let rect = host.container_rect().ok_or(SceneError::MissingContainer)?;
        log::info!("Creating scene in {}x{} container", rect.width, rect.height);

        let camera = Camera::from_config(&config.camera, rect.aspect_ratio().unwrap_or(1.0));
        let (width, height) = surface_size(&rect);
        renderer.set_size(width, height);
        host.mount_surface();

        let mut manager = Self {
            graph: SceneGraph::new(config.palette.background),
            config,
            host,
            renderer,
            camera,
            index: VisualObjectIndex::new(),
            resources: ResourceRegistry::new(),
            drag: DragTargetResolver::new(),
            animation: AnimationLoop::new(),
            listeners: ListenerRegistry::new(),
            rng: default_rng(),
            overloaded: false,
            disposed: false,
        };

        manager.builder().setup_lights();
        manager
            .listeners
            .attach(&mut manager.host, ListenerTarget::Window, DomEventKind::Resize);

        Ok(manager)
    }

    fn builder(&mut self) -> SceneBuilder<'_> {
        SceneBuilder::new(
            &mut self.graph,
            &mut self.index,
            &mut self.resources,
            &self.config.palette,
        )
    }

    // Construction

    /// Build a room volume and floor, then the room's lights and fans
    pub fn create_room(&mut self, room: &Room, position: Vec3, dimensions: Vec3, color: Color) {
        self.builder().create_room(room, position, dimensions, color);
    }

    /// Build a light fixture at `position`
    pub fn create_light(&mut self, light: &Device, position: Vec3) {
        self.builder().create_light(light, position);
    }

    /// Build a fan at `position`
    pub fn create_fan(&mut self, fan: &Device, position: Vec3) {
        self.builder().create_fan(fan, position);
    }

    /// Lay out every room of a snapshot side by side along X
    ///
    /// Rooms are centered on the origin with floors resting on `y = 0`.
    pub fn build_from_snapshot(&mut self, snapshot: &HouseSnapshot) {
        let layout = self.config.layout.clone();
        let dimensions = Vec3::from(layout.room_dimensions);
        #[allow(clippy::cast_precision_loss)]
        let first_offset = (snapshot.rooms.len().saturating_sub(1)) as f32 * layout.room_spacing / 2.0;

        for (i, room) in snapshot.rooms.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f32 * layout.room_spacing - first_offset;
            let color = match room.kind {
                RoomKind::Living => layout.colors.living,
                RoomKind::Bedroom => layout.colors.bedroom,
                RoomKind::Kitchen => layout.colors.kitchen,
                RoomKind::Bathroom => layout.colors.bathroom,
            };
            self.create_room(room, Vec3::new(x, dimensions.y / 2.0, 0.0), dimensions, color);
        }

        log::info!(
            "Built {} rooms, {} tagged objects",
            snapshot.rooms.len(),
            self.index.len()
        );
    }

    // Device state

    /// Switch a light's presentation on or off; unknown ids are ignored
    pub fn update_light(&mut self, light_id: &str, is_on: bool) {
        let Some(bulb) = self.index.lookup_kind(light_id, ObjectKind::Light) else {
            log::trace!("update_light: unknown light '{light_id}'");
            return;
        };
        apply_light_state(&mut self.graph, &mut self.resources, bulb, is_on, &self.config.palette);
    }

    /// Start or stop a fan's spin; unknown ids are ignored
    pub fn update_fan(&mut self, fan_id: &str, is_on: bool) {
        let node = match self.index.lookup_kind(fan_id, ObjectKind::Fan) {
            Some(key) => self.graph.node_mut(key),
            None => None,
        };
        match node {
            Some(fan) => fan.spinning = is_on,
            None => log::trace!("update_fan: unknown fan '{fan_id}'"),
        }
    }

    /// Set the power overload flag read by the next frames
    pub fn set_overload_state(&mut self, overloaded: bool) {
        if self.overloaded != overloaded {
            log::info!("Overload state: {overloaded}");
        }
        self.overloaded = overloaded;
    }

    /// Current power overload flag
    pub fn is_overloaded(&self) -> bool {
        self.overloaded
    }

    // Interaction

    /// All meshes under a client position, nearest first
    pub fn resolve_pointer(&self, client_x: f32, client_y: f32) -> HitResult {
        let pointer = PointerEvent::new(client_x, client_y);
        self.host
            .container_rect()
            .and_then(|rect| pointer_ray(&self.camera, &rect, pointer))
            .map(|ray| raycast(&self.graph, &self.resources, &ray))
            .unwrap_or_default()
    }

    /// Resolve a pointer position to a tagged object under `policy`
    pub fn pick(&self, pointer: PointerEvent, policy: PickPolicy) -> Option<ObjectIdentity> {
        let hits = self.resolve_pointer(pointer.client_x, pointer.client_y);
        resolve(&hits, &self.graph, &self.index, policy)
    }

    /// Report the clicked object to `callback`
    ///
    /// The callback receives `(domain id, kind)` and runs at most once. A
    /// click on empty space does not call it. Returns whether it ran.
    pub fn handle_click<F>(&self, event: PointerEvent, callback: F) -> bool
    where
        F: FnOnce(&str, ObjectKind),
    {
        match self.pick(event, PickPolicy::Interactive) {
            Some(identity) => {
                log::debug!("Clicked {} '{}'", identity.kind, identity.domain_id);
                callback(&identity.domain_id, identity.kind);
                true
            }
            None => {
                log::trace!("Clicked empty space");
                false
            }
        }
    }

    /// World position of the object representing a domain id
    pub fn object_position(&self, domain_id: &str) -> Option<Vec3> {
        let node = self.index.lookup(domain_id)?;
        let world = self.graph.world_matrix(node)?;
        Some(world.transform_point(&Point3::origin()).coords)
    }

    /// Client coordinates at which a world point appears
    pub fn client_position(&self, world: Vec3) -> Option<(f32, f32)> {
        let rect = self.host.container_rect()?;
        let ndc = self.camera.world_to_ndc(world);
        Some(rect.ndc_to_client(ndc.xy()))
    }

    /// Room under a drag position
    pub fn compute_room_at_pointer(&self, event: &DragEvent) -> Option<String> {
        let rect = self.host.container_rect()?;
        let ray = pointer_ray(&self.camera, &rect, event.pointer())?;
        self.drag.room_at(&ray, &self.graph, &self.resources, &self.index)
    }

    /// Clear every highlight, then highlight the room under the pointer
    pub fn highlight_room_on_drag_over(&mut self, event: &DragEvent) {
        self.clear_room_highlights();
        if let Some(room_id) = self.compute_room_at_pointer(event) {
            self.drag.highlight_room(
                &room_id,
                &self.graph,
                &mut self.resources,
                &self.index,
                &self.config.palette,
            );
        }
    }

    /// Restore every highlighted room
    pub fn clear_room_highlights(&mut self) {
        self.drag.clear(&self.graph, &mut self.resources, &self.index);
    }

    /// Currently highlighted room
    pub fn highlighted_room(&self) -> Option<&str> {
        self.drag.highlighted_rooms().next()
    }

    /// Start listening for drag-and-drop on the container and document
    pub fn setup_drag_and_drop(&mut self) {
        for (target, kind) in DRAG_LISTENERS {
            self.listeners.attach(&mut self.host, target, kind);
        }
    }

    /// Stop listening for drag-and-drop
    pub fn remove_drag_and_drop_handlers(&mut self) {
        for (_, kind) in DRAG_LISTENERS {
            self.listeners.detach(&mut self.host, kind);
        }
    }

    /// Route a platform event to its listener
    ///
    /// Events without an attached listener are ignored.
    pub fn handle_dom_event(&mut self, event: DomEvent) -> EventResponse {
        if self.disposed || !self.listeners.is_attached(event.kind()) {
            log::trace!("No listener for {:?}", event.kind());
            return EventResponse::ignored();
        }

        match event {
            DomEvent::Resize => {
                self.handle_resize();
                EventResponse::ignored()
            }
            DomEvent::DragOver(drag) => {
                self.highlight_room_on_drag_over(&drag);
                EventResponse::copy()
            }
            DomEvent::Drop(drag) => {
                self.handle_drop(&drag);
                EventResponse::prevented()
            }
            DomEvent::DragLeave(_) => {
                self.clear_room_highlights();
                EventResponse::ignored()
            }
            DomEvent::DragEnd => {
                self.clear_room_highlights();
                self.host.dispatch_event(SceneEvent::DeviceDragEnd);
                EventResponse::ignored()
            }
        }
    }

    fn handle_drop(&mut self, event: &DragEvent) {
        let room_id = self.compute_room_at_pointer(event);
        self.clear_room_highlights();

        let device_kind = match event.payload.as_deref() {
            Some(payload) => match payload.parse::<DeviceKind>() {
                Ok(kind) => Some(kind),
                Err(err) => {
                    log::warn!("Ignoring drop: {err}");
                    None
                }
            },
            None => None,
        };

        if let (Some(device_kind), Some(room_id)) = (device_kind, room_id) {
            log::debug!("Dropped {device_kind} on room '{room_id}'");
            self.host
                .dispatch_event(SceneEvent::DeviceDropped { device_kind, room_id });
        }
    }

    /// Match camera aspect and surface size to the container
    pub fn handle_resize(&mut self) {
        let Some(rect) = self.host.container_rect().filter(Rect::has_area) else {
            log::warn!("Resize ignored: container has no area");
            return;
        };
        if let Some(aspect) = rect.aspect_ratio() {
            self.camera.set_aspect_ratio(aspect);
        }
        let (width, height) = surface_size(&rect);
        self.renderer.set_size(width, height);
    }

    // Animation

    /// (Re)start the animation loop and run its first frame now
    pub fn animate(&mut self) {
        if self.animation.begin(&mut self.host) {
            self.advance_and_render();
        }
    }

    /// Stop the animation loop
    pub fn stop(&mut self) {
        self.animation.cancel(&mut self.host);
    }

    /// Host callback for a fired frame
    ///
    /// Stale or canceled frames are dropped. Returns whether a tick ran.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if !self.animation.accept(handle) {
            log::trace!("Dropping stale frame {handle:?}");
            return false;
        }
        self.animation.reschedule(&mut self.host);
        self.advance_and_render();
        true
    }

    fn advance_and_render(&mut self) {
        self.animation.tick(
            &mut self.graph,
            &mut self.resources,
            &self.index,
            self.overloaded,
            &self.config.animation,
            self.rng.as_mut(),
        );
        let frame = DrawList::build(&self.graph, &self.resources, &self.camera);
        self.renderer.render(&frame);
    }

    /// Replace the flicker random source
    pub fn set_flicker_rng(&mut self, rng: Box<dyn FlickerRng>) {
        self.rng = rng;
    }

    /// Animation loop state
    pub fn animation_state(&self) -> LoopState {
        self.animation.state()
    }

    // Lifecycle

    /// Tear everything down
    ///
    /// Cancels the loop, detaches every listener, unmounts the surface,
    /// releases every geometry and material exactly once and empties the
    /// scene and index. A second call does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            log::info!("Scene already disposed");
            return;
        }

        self.animation.mark_disposed(&mut self.host);
        self.listeners.detach_all(&mut self.host);
        self.host.unmount_surface();
        self.drag.reset();

        let mut geometries = HashSet::new();
        let mut materials = HashSet::new();
        for (_, node) in self.graph.iter() {
            if let NodeKind::Mesh { geometry, material, .. } = node.kind {
                geometries.insert(geometry);
                materials.insert(material);
            }
        }

        for geometry in geometries {
            if let Err(err) = self.resources.release_geometry(geometry) {
                log::warn!("{err}");
            }
        }
        for material in materials {
            if let Err(err) = self.resources.release_material(material) {
                log::warn!("{err}");
            }
        }
        let leaked = self.resources.release_all();
        if leaked > 0 {
            log::warn!("Released {leaked} resources not referenced by the scene");
        }

        self.graph.clear();
        self.index.clear();
        self.disposed = true;
        log::info!("Scene disposed");
    }

    /// Whether [`SceneManager::dispose`] has run
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // Accessors

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scene hierarchy
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Domain id ↔ node index
    pub fn index(&self) -> &VisualObjectIndex {
        &self.index
    }

    /// Geometry and material registry
    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// Current viewpoint
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Host platform
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host platform
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Render backend
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn surface_size(rect: &Rect) -> (u32, u32) {
    (rect.width.max(0.0).round() as u32, rect.height.max(0.0).round() as u32)
}
