use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::{RenderError, Result};
use crate::gl::{check_gl_error, GraphicsApi, ShaderStage};

/// Owns one GL program object plus the stages and uniforms registered on it.
///
/// Usage is strictly ordered: add stages, [`compile`](Self::compile), then
/// register uniforms with [`add_uniform`](Self::add_uniform). Uniform lookups
/// are never auto-discovered.
pub struct ShaderProgram<G: GraphicsApi> {
    gl: Rc<G>,
    program: G::Program,
    name: String,
    stages: Vec<(ShaderStage, G::Shader)>,
    uniforms: BTreeMap<String, G::UniformLocation>,
}

impl<G: GraphicsApi> ShaderProgram<G> {
    pub fn new(gl: Rc<G>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let program = gl.create_program().map_err(|err| {
            RenderError::Init(format!("failed to create shader program '{name}': {err}"))
        })?;
        Ok(Self {
            gl,
            program,
            name,
            stages: Vec::new(),
            uniforms: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> G::Program {
        self.program
    }

    pub(crate) fn gl(&self) -> &G {
        &self.gl
    }

    /// Compiles `source` as `stage` and attaches it to the program.
    ///
    /// A stage of the same kind added earlier is replaced.
    pub fn add_stage(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        let shader = self
            .gl
            .create_shader(stage)
            .map_err(|log| self.compile_error(stage, log, source))?;
        self.gl.shader_source(shader, source);
        self.gl.compile_shader(shader);
        if !self.gl.shader_compile_status(shader) {
            let log = self.gl.shader_info_log(shader);
            self.gl.delete_shader(shader);
            return Err(self.compile_error(stage, log, source));
        }

        if let Some(index) = self.stages.iter().position(|(kind, _)| *kind == stage) {
            let (_, previous) = self.stages.remove(index);
            self.release_stage(previous);
            debug!(program = %self.name, %stage, "replaced shader stage");
        }
        self.gl.attach_shader(self.program, shader);
        self.stages.push((stage, shader));
        Ok(())
    }

    /// Resolves and caches the location of `name`. Registering twice is a no-op.
    pub fn add_uniform(&mut self, name: &str) -> Result<()> {
        if self.uniforms.contains_key(name) {
            return Ok(());
        }
        let location = self
            .gl
            .uniform_location(self.program, name)
            .ok_or_else(|| self.lookup_error(name))?;
        self.uniforms.insert(name.to_string(), location);
        Ok(())
    }

    /// Links the attached stages and releases them on success.
    ///
    /// Also fails when the GL error flag is already set, whichever call raised it.
    pub fn compile(&mut self) -> Result<()> {
        self.gl.link_program(self.program);
        if !self.gl.program_link_status(self.program) {
            return Err(RenderError::ShaderLink {
                program: self.name.clone(),
                log: self.gl.program_info_log(self.program),
            });
        }

        for (_, shader) in std::mem::take(&mut self.stages) {
            self.release_stage(shader);
        }
        debug!(program = %self.name, "shader program linked");

        check_gl_error(self.gl.as_ref())
    }

    pub fn uniform_location(&self, name: &str) -> Result<G::UniformLocation> {
        self.uniforms
            .get(name)
            .cloned()
            .ok_or_else(|| self.lookup_error(name))
    }

    fn release_stage(&self, shader: G::Shader) {
        self.gl.detach_shader(self.program, shader);
        self.gl.delete_shader(shader);
    }

    fn compile_error(&self, stage: ShaderStage, log: String, source: &str) -> RenderError {
        RenderError::ShaderCompile {
            program: self.name.clone(),
            stage,
            log,
            shader_source: source.to_string(),
        }
    }

    fn lookup_error(&self, name: &str) -> RenderError {
        RenderError::UniformLookup {
            program: self.name.clone(),
            name: name.to_string(),
        }
    }
}

impl<G: GraphicsApi> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        for (_, shader) in std::mem::take(&mut self.stages) {
            self.release_stage(shader);
        }
        self.gl.delete_program(self.program);
    }
}
