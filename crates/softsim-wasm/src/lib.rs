use glam::Vec3;
use wasm_bindgen::prelude::*;

use softsim_core::{init_simulation, simulate_frame, Scene, SimulationParams, SolverKind};

/// GPU-compatible vertex: 32 bytes, position + normal with std430 padding.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuVertex {
    position: [f32; 3], // 12 bytes
    _pad0: f32,         //  4 bytes
    normal: [f32; 3],   // 12 bytes
    _pad1: f32,         //  4 bytes
}

#[wasm_bindgen]
pub struct SimulationWorld {
    scene: Scene,
    params: SimulationParams,
    /// One interleaved output buffer per shape, refreshed after each step.
    buffers: Vec<Vec<GpuVertex>>,
    initialized: bool,
}

impl Default for SimulationWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SimulationWorld {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SimulationWorld {
        web_sys::console::log_1(&"WASM SimulationWorld created".into());
        SimulationWorld {
            scene: Scene::new(),
            params: SimulationParams::default(),
            buffers: Vec::new(),
            initialized: false,
        }
    }

    /// Configure the run. `solver` is 0 = mass-spring, 1 = position-based;
    /// anything else is a configuration error.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn set_params(
        &mut self,
        solver: u32,
        frames: u32,
        gravity: f32,
        deltat: f32,
        substeps: u32,
        damping: f32,
        min_velocity: f32,
        bounce_tangential: f32,
        bounce_normal: f32,
        seed: u32,
    ) -> Result<(), JsValue> {
        let solver =
            SolverKind::try_from(solver).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.params = SimulationParams {
            solver,
            frames,
            gravity,
            deltat,
            substeps,
            damping,
            min_velocity,
            bounce: glam::Vec2::new(bounce_tangential, bounce_normal),
            seed: seed as u64,
        };
        self.initialized = false;
        Ok(())
    }

    /// Add a particle cloud; `positions` is a flat xyz array.
    #[wasm_bindgen]
    pub fn add_particles(
        &mut self,
        positions: &[f32],
        radius: &[f32],
        mass: f32,
        random_velocity: f32,
    ) -> u32 {
        let positions = unpack_vec3(positions);
        let points = (0..positions.len() as u32).collect();
        let id = self.scene.add_particles(
            points,
            positions,
            radius.to_vec(),
            mass,
            random_velocity,
        );
        self.initialized = false;
        self.buffers.push(Vec::new());
        id.index() as u32
    }

    /// Add a cloth sheet; `quads` is a flat array of vertex index 4-tuples.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn add_cloth(
        &mut self,
        quads: &[u32],
        positions: &[f32],
        normals: &[f32],
        radius: &[f32],
        mass: f32,
        spring_coeff: f32,
        pinned: &[u32],
    ) -> u32 {
        let id = self.scene.add_cloth(
            unpack_quads(quads),
            unpack_vec3(positions),
            unpack_vec3(normals),
            radius.to_vec(),
            mass,
            spring_coeff,
            pinned.to_vec(),
        );
        self.initialized = false;
        self.buffers.push(Vec::new());
        id.index() as u32
    }

    /// Add a static collider; pass an empty `quads` for a triangle mesh.
    #[wasm_bindgen]
    pub fn add_collider(
        &mut self,
        triangles: &[u32],
        quads: &[u32],
        positions: &[f32],
        normals: &[f32],
        radius: &[f32],
    ) -> u32 {
        let id = self.scene.add_collider(
            unpack_triangles(triangles),
            unpack_quads(quads),
            unpack_vec3(positions),
            unpack_vec3(normals),
            radius.to_vec(),
        );
        self.initialized = false;
        id.index() as u32
    }

    /// Advance one frame, (re)initializing first if the scene or parameters
    /// changed. Returns the step time in milliseconds.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<f32, JsValue> {
        let start = js_sys::Date::now();
        if !self.initialized {
            init_simulation(&mut self.scene, &self.params)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            self.initialized = true;
        }
        simulate_frame(&mut self.scene, &self.params);
        self.write_output();
        Ok((js_sys::Date::now() - start) as f32)
    }

    #[wasm_bindgen]
    pub fn shape_count(&self) -> usize {
        self.scene.shapes().len()
    }

    #[wasm_bindgen]
    pub fn vertex_count(&self, shape: usize) -> usize {
        self.scene.shapes()[shape].vertex_count()
    }

    #[wasm_bindgen]
    pub fn buffer_ptr(&self, shape: usize) -> *const f32 {
        self.buffers[shape].as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn buffer_byte_length(&self, shape: usize) -> usize {
        self.buffers[shape].len() * std::mem::size_of::<GpuVertex>()
    }
}

impl SimulationWorld {
    /// Pull-based export: repack each shape's positions and normals into the
    /// interleaved GPU buffers.
    fn write_output(&mut self) {
        for (shape, buffer) in self.scene.shapes().iter().zip(&mut self.buffers) {
            let (positions, normals) = shape.frame_output();
            buffer.clear();
            buffer.extend(positions.iter().zip(normals).map(|(p, n)| GpuVertex {
                position: p.to_array(),
                _pad0: 0.0,
                normal: n.to_array(),
                _pad1: 0.0,
            }));
        }
    }
}

fn unpack_vec3(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect()
}

fn unpack_triangles(flat: &[u32]) -> Vec<[u32; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

fn unpack_quads(flat: &[u32]) -> Vec<[u32; 4]> {
    flat.chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect()
}
