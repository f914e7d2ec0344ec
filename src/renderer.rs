// Renderer module for affine-cube

use winit::{
    event::{Event, WindowEvent, KeyEvent, ElementState},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    keyboard::{PhysicalKey, KeyCode},
};
use wgpu::{Adapter, RenderPipeline, Buffer};
use wgpu::util::DeviceExt;
use std::sync::Arc;
use std::time::Instant;
use glam::Vec3;
use log::{info, warn};

use affine_cube::{chain_multiply, Axis, Control, Matrix4, Scene, TransformOp};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// Maps GL clip depth [-1, 1] onto wgpu's [0, 1].
const GL_TO_WGPU_DEPTH: Matrix4 = Matrix4::from_rows([
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.5, 0.5],
    [0.0, 0.0, 0.0, 1.0],
]);

const AXIS_LENGTH: f32 = 3.0;

pub struct Renderer {
    adapter: Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    window: Arc<winit::window::Window>,
    cube_pipeline: RenderPipeline,
    axes_pipeline: RenderPipeline,
    cube_vertex_buffer: Buffer,
    cube_index_buffer: Buffer,
    cube_index_count: u32,
    axes_vertex_buffer: Buffer,
    cube_uniforms: UniformSlot,
    axes_uniforms: UniformSlot,
    depth_view: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    scene: Scene,
    last_frame: Instant,
    keys_pressed: KeyboardState,
    selection: Selection,
}

// Held keys pan the camera continuously.
#[derive(Default)]
struct KeyboardState {
    w: bool,
    a: bool,
    s: bool,
    d: bool,
}

/// Which target the arrow keys edit.
struct Selection {
    op: TransformOp,
    axis: Axis,
}

impl Selection {
    fn step(&self) -> f32 {
        match self.op {
            TransformOp::Scale => 0.1,
            TransformOp::Rotate => 15f32.to_radians(),
            TransformOp::Translate => 0.25,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

// Uniform buffer structure for MVP matrix
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
}

impl Uniforms {
    fn new() -> Self {
        Self {
            mvp: Matrix4::IDENTITY.to_cols_array_2d(),
        }
    }

    fn update_mvp(&mut self, mvp: &Matrix4) {
        self.mvp = chain_multiply(&[*mvp, GL_TO_WGPU_DEPTH]).to_cols_array_2d();
    }
}

struct UniformSlot {
    buffer: Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[Uniforms::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, mvp: &Matrix4) {
        let mut uniforms = Uniforms::new();
        uniforms.update_mvp(mvp);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }
}

/// Unit cube, one color per axis pair of faces, counter-clockwise from outside.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let k = 0.5;
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z, [0.9, 0.1, 0.1]),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y, [0.9, 0.1, 0.1]),
        (Vec3::Y, Vec3::Z, Vec3::X, [0.1, 0.9, 0.1]),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z, [0.1, 0.9, 0.1]),
        (Vec3::Z, Vec3::X, Vec3::Y, [0.1, 0.1, 0.9]),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X, [0.1, 0.1, 0.9]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v, color) in faces {
        let base = vertices.len() as u16;
        let center = normal * k;
        for corner in [-u - v, u - v, u + v, v - u] {
            vertices.push(Vertex {
                position: (center + corner * k).to_array(),
                color,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

fn axes_mesh(length: f32) -> Vec<Vertex> {
    let colors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    Axis::ALL
        .into_iter()
        .flat_map(|axis| {
            let mut end = [0.0; 3];
            end[axis.index()] = length;
            let start = end.map(|c: f32| -c);
            let color = colors[axis.index()];
            [Vertex { position: start, color }, Vertex { position: end, color }]
        })
        .collect()
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader_module: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
) -> RenderPipeline {
    let vertex_buffer_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: "vs_main",
            buffers: &[vertex_buffer_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

impl Renderer {
    pub async fn new(event_loop: &EventLoop<()>, scene: Scene) -> Self {
        // Create window with Arc for shared ownership
        let window = Arc::new(WindowBuilder::new()
            .with_title("affine-cube")
            .build(event_loop)
            .expect("Failed to create window"));

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).expect("Failed to create surface");

        let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }).await.expect("No suitable GPU adapter");

        let (device, queue) = adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Renderer Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::default(),
            },
            None, // Trace path
        ).await.expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        surface.configure(&device, &wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        });
        let depth_view = create_depth_view(&device, size.width, size.height);

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let cube_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader_module,
            surface_format,
            "Cube Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
        );
        let axes_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader_module,
            surface_format,
            "Axes Pipeline",
            wgpu::PrimitiveTopology::LineList,
            None,
        );

        let (cube_vertices, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&cube_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let axes_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Axes Vertex Buffer"),
            contents: bytemuck::cast_slice(&axes_mesh(AXIS_LENGTH)),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let cube_uniforms = UniformSlot::new(&device, &bind_group_layout, "Cube Uniforms");
        let axes_uniforms = UniformSlot::new(&device, &bind_group_layout, "Axes Uniforms");

        info!("controls: space=animate, 1/2/3=scale/rotate/translate, x/y/z=axis, up/down=edit, \
               r=axis order, o=op order, wasd=pan, q/e=dolly, backspace=reset");

        Self {
            adapter,
            device,
            queue,
            surface,
            window,
            cube_pipeline,
            axes_pipeline,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            axes_vertex_buffer,
            cube_uniforms,
            axes_uniforms,
            depth_view,
            surface_format,
            scene,
            last_frame: Instant::now(),
            keys_pressed: KeyboardState::default(),
            selection: Selection {
                op: TransformOp::Rotate,
                axis: Axis::X,
            },
        }
    }

    pub fn run(mut self, event_loop: EventLoop<()>) {
        let _ = event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    window_id,
                    event: WindowEvent::CloseRequested,
                } if window_id == self.window.id() => {
                    target.exit();
                }
                Event::WindowEvent {
                    event: WindowEvent::Resized(physical_size),
                    window_id,
                } if window_id == self.window.id() => {
                    self.resize(physical_size);
                }
                Event::AboutToWait => {
                    self.window.request_redraw();
                }
                Event::WindowEvent {
                    event: WindowEvent::RedrawRequested,
                    window_id,
                } if window_id == self.window.id() => {
                    self.update_and_render();
                }
                Event::WindowEvent {
                    event: WindowEvent::KeyboardInput { event, .. },
                    window_id,
                } if window_id == self.window.id() => {
                    self.handle_keyboard_input(event);
                }
                _ => {}
            }
        });
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let surface_caps = self.surface.get_capabilities(&self.adapter);

        self.surface.configure(&self.device, &wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            width: new_size.width,
            height: new_size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        });
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
    }

    fn handle_keyboard_input(&mut self, event: KeyEvent) {
        let PhysicalKey::Code(keycode) = event.physical_key else {
            return;
        };
        let is_pressed = event.state == ElementState::Pressed;
        match keycode {
            KeyCode::KeyW => self.keys_pressed.w = is_pressed,
            KeyCode::KeyA => self.keys_pressed.a = is_pressed,
            KeyCode::KeyS => self.keys_pressed.s = is_pressed,
            KeyCode::KeyD => self.keys_pressed.d = is_pressed,
            _ => {}
        }
        if !is_pressed {
            return;
        }

        let control = match keycode {
            KeyCode::Space if !event.repeat => Some(Control::ToggleAnimation),
            KeyCode::KeyR if !event.repeat => Some(Control::CycleAxisOrder),
            KeyCode::KeyO if !event.repeat => Some(Control::CycleOpOrder),
            KeyCode::Backspace => Some(Control::Reset),
            KeyCode::KeyQ => Some(Control::Dolly(0.25)),
            KeyCode::KeyE => Some(Control::Dolly(-0.25)),
            KeyCode::ArrowUp | KeyCode::ArrowDown => {
                let sign = if keycode == KeyCode::ArrowUp { 1.0 } else { -1.0 };
                Some(Control::Nudge {
                    op: self.selection.op,
                    axis: self.selection.axis,
                    amount: sign * self.selection.step(),
                })
            }
            KeyCode::Digit1 => { self.selection.op = TransformOp::Scale; None }
            KeyCode::Digit2 => { self.selection.op = TransformOp::Rotate; None }
            KeyCode::Digit3 => { self.selection.op = TransformOp::Translate; None }
            KeyCode::KeyX => { self.selection.axis = Axis::X; None }
            KeyCode::KeyY => { self.selection.axis = Axis::Y; None }
            KeyCode::KeyZ => { self.selection.axis = Axis::Z; None }
            _ => None,
        };

        if let Some(control) = control {
            self.scene.apply(control);
        }
    }

    fn update_and_render(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        // Pan the camera while WASD is held
        let pan = self.scene.sensitivity * dt;
        let mut pan_x = 0.0;
        let mut pan_y = 0.0;
        if self.keys_pressed.w { pan_y += pan; }
        if self.keys_pressed.s { pan_y -= pan; }
        if self.keys_pressed.a { pan_x -= pan; }
        if self.keys_pressed.d { pan_x += pan; }
        if pan_x != 0.0 || pan_y != 0.0 {
            self.scene.apply(Control::Pan { x: pan_x, y: pan_y });
        }

        self.scene.tick(dt * 1000.0);

        let size = self.window.inner_size();
        let aspect_ratio = size.width.max(1) as f32 / size.height.max(1) as f32;
        let frame = match self.scene.frame(aspect_ratio) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("skipping frame: {err}");
                return;
            }
        };

        self.cube_uniforms.write(&self.queue, &frame.mvp);
        let view_projection = chain_multiply(&[frame.view, frame.projection]);
        self.axes_uniforms.write(&self.queue, &view_projection);

        self.render();
    }

    fn render(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(_) => {
                self.resize(self.window.inner_size());
                return;
            }
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.axes_pipeline);
            render_pass.set_bind_group(0, &self.axes_uniforms.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.axes_vertex_buffer.slice(..));
            render_pass.draw(0..6, 0..1);

            render_pass.set_pipeline(&self.cube_pipeline);
            render_pass.set_bind_group(0, &self.cube_uniforms.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.cube_index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
