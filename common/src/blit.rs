//! Uploads a CPU-rendered [`PixelBuffer`] to a texture and draws it to the surface

use glam::Vec2;

use crate::graphics::GraphicsContext;
use crate::raster::PixelBuffer;

/// Screen-space rectangle in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    /// Largest rectangle of the frame's aspect ratio centered inside `self`
    pub fn fit(&self, frame_width: u32, frame_height: u32) -> ScreenRect {
        let frame_aspect = frame_width.max(1) as f32 / frame_height.max(1) as f32;
        let area_aspect = self.width / self.height.max(1.0);

        let (width, height) = if area_aspect > frame_aspect {
            (self.height * frame_aspect, self.height)
        } else {
            (self.width, self.width / frame_aspect)
        };

        ScreenRect {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

pub struct FrameBlitter {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    texture_size: (u32, u32),
    last_rect: Option<ScreenRect>,
}

impl FrameBlitter {
    pub fn new(ctx: &GraphicsContext, width: u32, height: u32) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let (texture, bind_group) =
            Self::create_texture(device, &bind_group_layout, &sampler, width, height);

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            texture,
            bind_group,
            texture_size: (width, height),
            last_rect: None,
        }
    }

    fn create_texture(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::BindGroup) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        (texture, bind_group)
    }

    /// Copy the frame into the texture, recreating it if the size changed
    pub fn upload(&mut self, ctx: &GraphicsContext, frame: &PixelBuffer) {
        let size = (frame.width().max(1), frame.height().max(1));
        if size != self.texture_size {
            log::debug!("Recreating frame texture at {}x{}", size.0, size.1);
            let (texture, bind_group) = Self::create_texture(
                &ctx.device,
                &self.bind_group_layout,
                &self.sampler,
                size.0,
                size.1,
            );
            self.texture = texture;
            self.bind_group = bind_group;
            self.texture_size = size;
        }

        if frame.width() == 0 || frame.height() == 0 {
            return;
        }

        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * frame.width()),
                rows_per_image: Some(frame.height()),
            },
            wgpu::Extent3d {
                width: frame.width(),
                height: frame.height(),
                depth_or_array_layers: 1,
            },
        );
    }

    /// Clear the target and draw the frame letterboxed into `area`
    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        area: ScreenRect,
    ) {
        let rect = area.fit(self.texture_size.0, self.texture_size.1);
        self.last_rect = Some(rect);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.008,
                        g: 0.024,
                        b: 0.09,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if rect.width < 1.0 || rect.height < 1.0 {
            return;
        }

        render_pass.set_viewport(rect.x, rect.y, rect.width, rect.height, 0.0, 1.0);
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }

    /// Map a window position to frame pixel coordinates, if it lands on the frame
    pub fn to_frame_coords(&self, window_pos: Vec2) -> Option<Vec2> {
        let rect = self.last_rect?;
        if !rect.contains(window_pos) {
            return None;
        }
        let (w, h) = self.texture_size;
        Some(Vec2::new(
            (window_pos.x - rect.x) / rect.width * w as f32,
            (window_pos.y - rect.y) / rect.height * h as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fit_letterboxes_wide_area() {
        let area = ScreenRect::new(0.0, 0.0, 800.0, 400.0);
        let rect = area.fit(400, 400);
        assert_abs_diff_eq!(rect.width, 400.0);
        assert_abs_diff_eq!(rect.height, 400.0);
        assert_abs_diff_eq!(rect.x, 200.0);
        assert_abs_diff_eq!(rect.y, 0.0);
    }

    #[test]
    fn fit_pillarboxes_tall_area() {
        let area = ScreenRect::new(10.0, 0.0, 200.0, 600.0);
        let rect = area.fit(800, 400);
        assert_abs_diff_eq!(rect.width, 200.0);
        assert_abs_diff_eq!(rect.height, 100.0);
        assert_abs_diff_eq!(rect.x, 10.0);
        assert_abs_diff_eq!(rect.y, 250.0);
    }
}
