use softring::{
    BuildRequest, CollisionEvent, ControlPointRelaxation, FeedbackConfig, InstanceId, Integrator,
    MemoryBackend, Node, NoOpObserver, Owner, Profile, RelaxationConfig, SoftbodyInstance,
    TopologyBuilder, TweakEngine, Vec2, WobbleFeedback,
};
use wasm_bindgen::prelude::*;

// ---- Wobble Demo ----

#[wasm_bindgen]
pub struct WobbleDemo {
    feedback: WobbleFeedback<f32>,
}

#[wasm_bindgen]
impl WobbleDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(half_width: f32, half_height: f32) -> Self {
        let config = FeedbackConfig::new().with_integrator(Integrator::Analytic);
        WobbleDemo {
            feedback: WobbleFeedback::from_extents(Vec2::new(half_width, half_height), config),
        }
    }

    /// Hit from direction `(nx, ny)` with relative speed `impulse`.
    pub fn hit(&mut self, nx: f32, ny: f32, impulse: f32) {
        let len = (nx * nx + ny * ny).sqrt();
        if len < 1e-6 {
            return;
        }
        let normal = Vec2::new(nx / len, ny / len);
        self.feedback.on_collision(&CollisionEvent::new(normal, impulse.max(0.0)));
    }

    pub fn update(&mut self, dt: f32) {
        self.feedback.step(dt);
    }

    /// Returns [wobble_x, wobble_y, squash, radius]
    pub fn params(&self) -> Vec<f32> {
        let p = self.feedback.params();
        vec![p.wobble.x, p.wobble.y, p.squash, p.radius]
    }
}

// ---- Relaxation Demo ----

#[wasm_bindgen]
pub struct RelaxationDemo {
    points: ControlPointRelaxation<f32>,
    center: Vec2<f32>,
}

#[wasm_bindgen]
impl RelaxationDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(cx: f32, cy: f32, radius: f32, count: usize) -> Self {
        let offsets: Vec<Vec2<f32>> = (0..count)
            .map(|i| {
                let a = i as f32 / count.max(1) as f32 * core::f32::consts::TAU;
                Vec2::new(radius * a.cos(), radius * a.sin())
            })
            .collect();
        RelaxationDemo {
            points: ControlPointRelaxation::new(&offsets, RelaxationConfig::new()),
            center: Vec2::new(cx, cy),
        }
    }

    pub fn poke(&mut self, x: f32, y: f32, amount: f32) {
        let dx = self.center.x - x;
        let dy = self.center.y - y;
        let len = (dx * dx + dy * dy).sqrt();
        if len > 1e-5 {
            // Contact normal points from the body toward the poker.
            self.points.nudge(Vec2::new(-dx / len, -dy / len), amount);
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.points.step(dt);
    }

    /// Returns flat [x0, y0, x1, y1, ...] world positions
    pub fn positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 2);
        for p in self.points.points() {
            out.push(self.center.x + p.offset.x);
            out.push(self.center.y + p.offset.y);
        }
        out
    }
}

// ---- Topology Demo ----

#[wasm_bindgen]
pub struct TopologyDemo {
    instance: SoftbodyInstance<f32>,
    backend: MemoryBackend<f32>,
    has_central: bool,
    profile: Profile<f32>,
}

#[wasm_bindgen]
impl TopologyDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(cx: f32, cy: f32, radius: f32, ring_nodes: usize, has_central: bool) -> Self {
        let mut nodes = Vec::new();
        if has_central {
            nodes.push(Node::at("hub", Vec2::new(cx, cy)));
        }
        for i in 0..ring_nodes {
            let a = i as f32 / ring_nodes.max(1) as f32 * core::f32::consts::TAU;
            nodes.push(Node::at(format!("n{}", i), Vec2::new(cx + radius * a.cos(), cy + radius * a.sin())));
        }
        let instance = SoftbodyInstance::new(InstanceId(0), nodes)
            .with_root_position(Vec2::new(cx, cy))
            .with_bound_radius(radius);

        let mut demo = TopologyDemo {
            instance,
            backend: MemoryBackend::new(),
            has_central,
            profile: Profile::new(),
        };
        demo.rebuild();
        demo
    }

    /// Rebuild with the current profile. Returns false if the build was rejected.
    pub fn rebuild(&mut self) -> bool {
        let request = BuildRequest::new().with_central(self.has_central).with_profile(self.profile);
        TopologyBuilder::build(&mut self.instance, &request, &mut self.backend, &mut NoOpObserver).is_ok()
    }

    pub fn set_strut(&mut self, enabled: bool) -> bool {
        self.profile = self.profile.with_anti_compression_strut(enabled);
        self.rebuild()
    }

    pub fn set_spring(&mut self, frequency: f32, damping_ratio: f32) -> bool {
        self.profile = self
            .profile
            .with_spring_frequency(frequency)
            .with_spring_damping_ratio(damping_ratio);
        TweakEngine::apply(&mut [&mut self.instance], Some(&self.profile), &mut self.backend, &mut NoOpObserver)
            .is_ok()
    }

    pub fn drag_node(&mut self, index: usize, x: f32, y: f32) {
        self.instance.set_node_position(index, Vec2::new(x, y));
    }

    /// Returns flat [x0, y0, x1, y1, kind, ...] per edge, `kind` being the
    /// edge kind's discriminant.
    pub fn edges(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.instance.edge_count() * 5);
        for (key, edge) in self.instance.edges() {
            let (Some(a), Some(b)) =
                (self.instance.position_of(key.source), self.instance.position_of(edge.target))
            else {
                continue;
            };
            out.extend_from_slice(&[a.x, a.y, b.x, b.y, key.kind as u8 as f32]);
        }
        out
    }

    pub fn node_positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.instance.node_count() * 2);
        for node in self.instance.nodes() {
            out.push(node.position.x);
            out.push(node.position.y);
        }
        out
    }

    pub fn root_radius(&self) -> f32 {
        self.instance.shape(Owner::Root).map_or(0.0, |s| s.radius)
    }

    pub fn backend_edge_count(&self) -> usize {
        self.backend.edge_count()
    }
}
