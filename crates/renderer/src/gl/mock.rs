//! Headless `GraphicsApi` that records calls and simulates driver outcomes.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use super::{GraphicsApi, ShaderStage};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    LinkProgram(u32),
    UseProgram(Option<u32>),
    CompileShader(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    UniformLocation(String),
    Uniform1f(i32, f32),
    BindVertexArray(Option<u32>),
    BufferData(usize),
    EnableAttrib(u32),
    AttribPointer(u32, i32),
    DrawTriangleStrip(i32, i32),
    BindDefaultFramebuffer,
    ClearColorBuffer,
    Viewport(i32, i32, i32, i32),
}

#[derive(Default)]
struct State {
    next_id: u32,
    programs: BTreeSet<u32>,
    linked: BTreeSet<u32>,
    shaders: BTreeMap<u32, String>,
    attached: BTreeSet<(u32, u32)>,
    buffers: BTreeSet<u32>,
    vertex_arrays: BTreeSet<u32>,
    declared_uniforms: Vec<String>,
    rejected_sources: Vec<(String, String)>,
    link_failure: Option<String>,
    error: Option<u32>,
    calls: Vec<Call>,
}

impl State {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct MockGl {
    state: RefCell<State>,
}

impl MockGl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes `name` an active uniform in every successfully linked program.
    pub(crate) fn declare_uniform(&self, name: &str) {
        self.state.borrow_mut().declared_uniforms.push(name.to_string());
    }

    /// Any shader whose source contains `needle` fails to compile with `log`.
    pub(crate) fn reject_sources_containing(&self, needle: &str, log: &str) {
        self.state
            .borrow_mut()
            .rejected_sources
            .push((needle.to_string(), log.to_string()));
    }

    pub(crate) fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    pub(crate) fn raise_error(&self, code: u32) {
        self.state.borrow_mut().error = Some(code);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|call| matches(call)).count()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub(crate) fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub(crate) fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub(crate) fn attached_stages(&self) -> usize {
        self.state.borrow().attached.len()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GraphicsApi for MockGl {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = i32;

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.programs.insert(id);
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.linked.remove(&program);
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
        let mut state = self.state.borrow_mut();
        if state.link_failure.is_none() {
            state.linked.insert(program);
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().linked.contains(&program)
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.state.borrow().link_failure.clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn create_shader(&self, _stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.shaders.insert(id, String::new());
        Ok(id)
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(slot) = self.state.borrow_mut().shaders.get_mut(&shader) {
            *slot = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.shader_info_log(shader).is_empty()
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let state = self.state.borrow();
        let source = state.shaders.get(&shader).cloned().unwrap_or_default();
        state
            .rejected_sources
            .iter()
            .find(|(needle, _)| source.contains(needle.as_str()))
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
        self.state.borrow_mut().attached.insert((program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
        self.state.borrow_mut().attached.remove(&(program, shader));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        self.record(Call::UniformLocation(name.to_string()));
        let state = self.state.borrow();
        if !state.linked.contains(&program) {
            return None;
        }
        state
            .declared_uniforms
            .iter()
            .position(|declared| declared == name)
            .map(|index| index as i32)
    }

    fn uniform_1_f32(&self, location: &i32, value: f32) {
        self.record(Call::Uniform1f(*location, value));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.vertex_arrays.insert(id);
        Ok(id)
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.state.borrow_mut().vertex_arrays.remove(&vertex_array);
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.buffers.insert(id);
        Ok(id)
    }

    fn delete_buffer(&self, buffer: u32) {
        self.state.borrow_mut().buffers.remove(&buffer);
    }

    fn bind_array_buffer(&self, _buffer: Option<u32>) {}

    fn array_buffer_data_static(&self, data: &[u8]) {
        self.record(Call::BufferData(data.len()));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32) {
        self.record(Call::AttribPointer(index, components));
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangleStrip(first, count));
    }

    fn bind_default_framebuffer(&self) {
        self.record(Call::BindDefaultFramebuffer);
    }

    fn clear_color(&self, _red: f32, _green: f32, _blue: f32, _alpha: f32) {}

    fn clear_color_buffer(&self) {
        self.record(Call::ClearColorBuffer);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn get_error(&self) -> u32 {
        self.state.borrow_mut().error.take().unwrap_or(glow::NO_ERROR)
    }
}
