//! Fully handles drawing of custom graphics to the editor window.
//!
//! In this plugin, rendering is achieved with `wgpu`, which provides a very low-level API. The
//! whole window is covered by a single rectangle, and the fragment shader draws both knobs
//! procedurally from a small uniform buffer describing their positions and values.

use cgmath::{Deg, Matrix2, Vector2};
use raw_window_handle::HasRawWindowHandle;
use wgpu::util::DeviceExt;
use zerocopy::AsBytes;

use super::{state::InterfaceState, SIZE_X, SIZE_Y};
use crate::error::Error;

/// Knob limits are this many degrees on either side of the top position.
const KNOB_LIMIT_DEG: f32 = 150.;

/// Contains all handles to GPU resources required for rendering the editor interface.
pub(super) struct Renderer {
    surface: wgpu::Surface,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    pipeline: wgpu::RenderPipeline,
    quad_index_buffer: wgpu::Buffer,
    quad_vertex_buffer: wgpu::Buffer,

    knobs_bind_group: wgpu::BindGroup,
    knobs_uniform_buffer: wgpu::Buffer,
}

/// Low-level representation of a point in 2D space. This representation is designed to be shared
/// directly with GPU memory for use in shaders.
#[repr(C)]
#[derive(Clone, Copy, AsBytes)]
struct Vertex {
    _pos: [f32; 2],
}

/// A rectangle covering the whole window, split into two triangles.
const QUAD: [Vertex; 4] = [
    Vertex { _pos: [-1., -1.] },
    Vertex { _pos: [1., -1.] },
    Vertex { _pos: [1., 1.] },
    Vertex { _pos: [-1., 1.] },
];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Everything the fragment shader needs to know about the knobs, laid out to match the `Knobs`
/// uniform block in `knobs.frag`.
#[repr(C)]
#[derive(Clone, Copy, Default, AsBytes)]
struct KnobsUniform {
    /// Center x, center y, radius (in pixels), and normalized value of each knob.
    geometry: [[f32; 4]; 2],
    /// Unit direction of each knob's pointer with y pointing down, then a dragged flag.
    pointer: [[f32; 4]; 2],
}

impl KnobsUniform {
    fn from_state(state: &InterfaceState) -> Self {
        let mut uniform = Self::default();
        for (i, (layout, value)) in state.knobs().enumerate() {
            // Pointer starts at the top position. With y pointing down, a positive rotation turns
            // it clockwise.
            let angle = Deg(value * 2. * KNOB_LIMIT_DEG - KNOB_LIMIT_DEG);
            let direction = Matrix2::from_angle(angle) * Vector2::new(0., -1.);
            let dragged = if state.is_dragging(layout.param) { 1. } else { 0. };

            uniform.geometry[i] = [
                layout.center_x as f32,
                layout.center_y as f32,
                layout.radius as f32,
                value,
            ];
            uniform.pointer[i] = [direction.x, direction.y, dragged, 0.];
        }
        uniform
    }
}

impl Renderer {
    /// Creates a new `Renderer` by initializing the GPU to prepare it for rendering into `window`.
    pub fn new<W: HasRawWindowHandle>(window: W) -> Result<Self, Error> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);

        // Acquire the window as a surface to be rendered on. This is the only unsafe code in the
        // plugin; it is only required to satisfy the `raw_window_handle` API. Safety is upheld by
        // taking ownership of `window` in the function signature, ensuring it is only ever used to
        // create a single surface.
        let surface = unsafe { instance.create_surface(&window) };

        // Get a handle to the GPU and a queue of commands to be uploaded to it while rendering.
        let adapter = futures::executor::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                ..Default::default()
            },
        ))
        .ok_or(Error::NoAdapter)?;
        tracing::debug!(adapter = %adapter.get_info().name, "selected graphics adapter");

        let (device, queue) = futures::executor::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface
                .get_preferred_format(&adapter)
                .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb),
            width: SIZE_X as u32,
            height: SIZE_Y as u32,
            present_mode: wgpu::PresentMode::Fifo,
        };
        surface.configure(&device, &surface_config);

        // Shaders are written in GLSL and compiled to SPIR-V from `build.rs`.
        let vs_module = device.create_shader_module(&wgpu::include_spirv!(
            "../../../assets/generated/spirv/knobs.vert.spv"
        ));
        let fs_module = device.create_shader_module(&wgpu::include_spirv!(
            "../../../assets/generated/spirv/knobs.frag.spv"
        ));

        // Binding 0 is the uniform buffer describing the knobs, read by the fragment shader.
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: "main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: "main",
                targets: &[wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
        });

        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: None,
            contents: QUAD[..].as_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: None,
            contents: QUAD_INDICES[..].as_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        // The uniform buffer is rewritten before every frame.
        let knobs_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: None,
            contents: KnobsUniform::default().as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let knobs_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: knobs_uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,

            pipeline,
            quad_index_buffer,
            quad_vertex_buffer,

            knobs_bind_group,
            knobs_uniform_buffer,
        })
    }

    /// Render a single frame of the given interface state to the screen.
    pub fn draw_frame(&mut self, state: &InterfaceState) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(e) => {
                tracing::debug!("skipping frame: {}", e);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.knobs_uniform_buffer,
            0 as wgpu::BufferAddress,
            KnobsUniform::from_state(state).as_bytes(),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                }],
                depth_stencil_attachment: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.knobs_bind_group, &[]);
            rpass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
