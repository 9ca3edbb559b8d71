// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::command::{Command, CommandContext};
use crate::proxy::Proxy;
use crate::resource::{Bindable, Creatable, RenderResource, ResourceId};
use crate::submit::Submitter;
use ember_core::math::Mat4;
use ember_core::renderer::{
    GraphicsDevice, ResourceError, ShaderDescriptor, ShaderId, ShaderSource, UniformValue,
};
use std::fmt;

/// A linked shader program.
#[derive(Debug)]
pub struct Shader {
    program: ShaderId,
    name: String,
}

impl Shader {
    /// The backend program.
    pub fn program_id(&self) -> ShaderId {
        self.program
    }

    /// The name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Arguments captured by the `Create` command of a [`Shader`].
pub struct ShaderArgs {
    /// Debug name of the program.
    pub name: String,
    /// The program code.
    pub source: ShaderSource,
}

impl fmt::Debug for ShaderArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            ShaderSource::Glsl(code) => format!("Glsl({} bytes)", code.len()),
            ShaderSource::SpirV { vertex, pixel } => {
                format!("SpirV({} + {} words)", vertex.len(), pixel.len())
            }
        };
        f.debug_struct("ShaderArgs")
            .field("name", &self.name)
            .field("source", &source)
            .finish()
    }
}

impl RenderResource for Shader {
    const KIND: &'static str = "Shader";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_shader(self.program)
    }
}

impl Creatable for Shader {
    type Args = ShaderArgs;

    fn create(device: &mut dyn GraphicsDevice, args: Self::Args) -> Result<Self, ResourceError> {
        args.source.validate(&args.name)?;
        let program = device.create_shader(&ShaderDescriptor {
            label: &args.name,
            source: &args.source,
        })?;
        Ok(Self {
            program,
            name: args.name,
        })
    }
}

impl Bindable for Shader {
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_shader(Some(self.program))
    }

    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_shader(None)
    }
}

/// Uploads a value to a named uniform.
#[derive(Debug)]
pub struct SetUniform {
    id: ResourceId,
    name: String,
    value: UniformValue,
}

impl Command for SetUniform {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let SetUniform { id, name, value } = *self;
        ctx.with_resource::<Shader, _, _>(id, "SetUniform", |shader, device| {
            device.set_uniform(shader.program, &name, &value)
        });
    }
}

/// Application-side value of a [`Shader`].
pub type ShaderProxy = Proxy<Shader>;

impl Proxy<Shader> {
    /// Creates a program named `name` from `source`.
    ///
    /// An invalid source or a backend compile error leaves the shader empty: every later
    /// operation on it is skipped with a warning.
    pub fn create(
        submitter: &impl AsRef<Submitter>,
        name: impl Into<String>,
        source: ShaderSource,
    ) -> Self {
        Self::spawn(
            submitter.as_ref(),
            ShaderArgs {
                name: name.into(),
                source,
            },
        )
    }

    /// Queues an upload of `value` to the uniform `name`.
    pub fn set_uniform(&self, name: impl Into<String>, value: UniformValue) {
        self.submitter().push(SetUniform {
            id: self.id(),
            name: name.into(),
            value,
        });
    }

    /// Queues an `int` uniform upload.
    pub fn set_int(&self, name: impl Into<String>, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    /// Queues a `float` uniform upload.
    pub fn set_float(&self, name: impl Into<String>, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    /// Queues a `vec2` uniform upload.
    pub fn set_float2(&self, name: impl Into<String>, value: [f32; 2]) {
        self.set_uniform(name, UniformValue::Float2(value));
    }

    /// Queues a `vec3` uniform upload.
    pub fn set_float3(&self, name: impl Into<String>, value: [f32; 3]) {
        self.set_uniform(name, UniformValue::Float3(value));
    }

    /// Queues a `vec4` uniform upload.
    pub fn set_float4(&self, name: impl Into<String>, value: [f32; 4]) {
        self.set_uniform(name, UniformValue::Float4(value));
    }

    /// Queues a `mat4` uniform upload.
    pub fn set_mat4(&self, name: impl Into<String>, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }
}
