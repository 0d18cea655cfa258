use std::rc::Rc;

use tracing::debug;

use crate::error::{RenderError, Result};
use crate::gl::{check_gl_error, GraphicsApi, ShaderStage};
use crate::shader::ShaderProgram;

/// Half of the strip width in normalised device coordinates.
pub const STRIP_HALF_WIDTH: f32 = 0.1;

/// Triangle-strip corners of the full-height quad, centred on x = 0.
pub const STRIP_VERTICES: [[f32; 2]; 4] = [
    [-STRIP_HALF_WIDTH, -1.0],
    [STRIP_HALF_WIDTH, -1.0],
    [-STRIP_HALF_WIDTH, 1.0],
    [STRIP_HALF_WIDTH, 1.0],
];

const POSITION_ATTRIBUTE: u32 = 0;
const POS_UNIFORM: &str = "pos";

/// Translates the quad horizontally by `pos`; no projection is applied.
const VERTEX_SHADER: &str = r"#version 400 core

layout(location=0) in vec2 vertex;

uniform float pos;

void main(void)
{
    gl_Position = vec4(vertex.x + pos, vertex.y, 0.0f, 1.0f);
}
";

const FRAGMENT_SHADER: &str = r"#version 400 core

out vec4 fColor;

void main(void)
{
    fColor = vec4(1.0f, 1.0f, 1.0f, 1.0f);
}
";

enum StripState<G: GraphicsApi> {
    Uninitialized,
    Ready(StripResources<G>),
}

struct StripResources<G: GraphicsApi> {
    program: ShaderProgram<G>,
    pos_location: G::UniformLocation,
    vertex_array: G::VertexArray,
    buffer: G::Buffer,
}

/// The single white bar swept across the screen every frame.
///
/// GPU resources are built on the first [`draw`](Strip::draw) so the strip can
/// be constructed before a context exists to compile against.
pub struct Strip<G: GraphicsApi> {
    gl: Rc<G>,
    state: StripState<G>,
}

impl<G: GraphicsApi> Strip<G> {
    pub fn new(gl: Rc<G>) -> Self {
        Self {
            gl,
            state: StripState::Uninitialized,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, StripState::Ready(_))
    }

    /// Draws the strip shifted by `offset` along x.
    pub fn draw(&mut self, offset: f32) -> Result<()> {
        if let StripState::Ready(resources) = &self.state {
            return resources.draw(offset);
        }
        let resources = self.build()?;
        let drawn = resources.draw(offset);
        self.state = StripState::Ready(resources);
        drawn
    }

    fn build(&self) -> Result<StripResources<G>> {
        let mut program = ShaderProgram::new(self.gl.clone(), "strip")?;
        program.add_stage(ShaderStage::Vertex, VERTEX_SHADER)?;
        program.add_stage(ShaderStage::Fragment, FRAGMENT_SHADER)?;
        program.compile()?;
        program.add_uniform(POS_UNIFORM)?;
        let pos_location = program.uniform_location(POS_UNIFORM)?;

        let gl = self.gl.as_ref();
        gl.use_program(Some(program.program()));

        let vertex_array = gl
            .create_vertex_array()
            .map_err(|err| RenderError::Init(format!("failed to create vertex array: {err}")))?;
        gl.bind_vertex_array(Some(vertex_array));

        let buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(err) => {
                gl.delete_vertex_array(vertex_array);
                return Err(RenderError::Init(format!(
                    "failed to create vertex buffer: {err}"
                )));
            }
        };
        gl.bind_array_buffer(Some(buffer));
        gl.array_buffer_data_static(bytemuck::cast_slice(&STRIP_VERTICES));
        gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);
        gl.vertex_attrib_pointer_f32(POSITION_ATTRIBUTE, 2);

        let resources = StripResources {
            program,
            pos_location,
            vertex_array,
            buffer,
        };
        check_gl_error(gl)?;
        debug!("strip geometry uploaded");
        Ok(resources)
    }
}

impl<G: GraphicsApi> StripResources<G> {
    fn draw(&self, offset: f32) -> Result<()> {
        let gl = self.program.gl();
        gl.use_program(Some(self.program.program()));
        gl.uniform_1_f32(&self.pos_location, offset);
        gl.bind_vertex_array(Some(self.vertex_array));
        gl.draw_triangle_strip(0, STRIP_VERTICES.len() as i32);
        check_gl_error(gl)
    }
}

impl<G: GraphicsApi> Drop for StripResources<G> {
    fn drop(&mut self) {
        let gl = self.program.gl();
        gl.delete_buffer(self.buffer);
        gl.delete_vertex_array(self.vertex_array);
    }
}
