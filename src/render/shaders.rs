//! WGSL sources for every pipeline, embedded in the binary.
//!
//! The uniform structs here mirror the `bytemuck` structs in
//! `render::pipelines` field for field; the `normal` matrix is carried as
//! `mat3x4` because uniform-space `mat3x3` columns pad to vec4 anyway.

pub(crate) const SKYBOX: &str = r#"
struct SkyboxUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> u: SkyboxUniforms;

@group(1) @binding(0)
var sky_texture: texture_cube<f32>;
@group(1) @binding(1)
var sky_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) direction: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.position = u.projection * u.modelview * vec4<f32>(input.position, 1.0);
    output.direction = input.position;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sky_texture, sky_sampler, normalize(input.direction));
}
"#;

pub(crate) const GENERAL: &str = r#"
struct GeneralUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
    normal: mat3x4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    light_position: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    shininess: vec4<f32>,
    attenuation: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: GeneralUniforms;

@group(1) @binding(0)
var surface_texture: texture_2d<f32>;
@group(1) @binding(1)
var surface_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) eye_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

fn normal_matrix() -> mat3x3<f32> {
    return mat3x3<f32>(u.normal[0].xyz, u.normal[1].xyz, u.normal[2].xyz);
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let eye_pos = u.modelview * vec4<f32>(input.position, 1.0);
    output.position = u.projection * eye_pos;
    output.eye_pos = eye_pos.xyz;
    output.normal = normalize(normal_matrix() * input.normal);
    output.texcoord = input.texcoord;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.normal);
    let to_light = u.light_position.xyz - input.eye_pos;
    let dist = length(to_light);
    let light_dir = to_light / dist;
    let view_dir = normalize(-input.eye_pos);

    let falloff = 1.0 / (u.attenuation.x + u.attenuation.y * dist
        + u.attenuation.z * dist * dist);
    let diffuse = max(dot(n, light_dir), 0.0);
    let reflected = reflect(-light_dir, n);
    let specular = pow(max(dot(reflected, view_dir), 0.0), u.shininess.x);

    let texel = textureSample(surface_texture, surface_sampler, input.texcoord);
    let ambient = u.light_ambient * u.material_ambient;
    let lit = falloff * (u.light_diffuse * u.material_diffuse * diffuse
        + u.light_specular * u.material_specular * specular);
    let color = (ambient + lit).rgb * texel.rgb;
    return vec4<f32>(color, u.material_diffuse.a * texel.a);
}
"#;

pub(crate) const GOURAUD: &str = r#"
struct LitUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
    normal: mat3x4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    light_position: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    shininess: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: LitUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let eye_pos = u.modelview * vec4<f32>(input.position, 1.0);
    output.position = u.projection * eye_pos;

    let n = normalize(mat3x3<f32>(u.normal[0].xyz, u.normal[1].xyz, u.normal[2].xyz)
        * input.normal);
    let light_dir = normalize(u.light_position.xyz - eye_pos.xyz);
    let view_dir = normalize(-eye_pos.xyz);

    let diffuse = max(dot(n, light_dir), 0.0);
    let reflected = reflect(-light_dir, n);
    let specular = pow(max(dot(reflected, view_dir), 0.0), u.shininess.x);

    let color = u.light_ambient * u.material_ambient
        + u.light_diffuse * u.material_diffuse * diffuse
        + u.light_specular * u.material_specular * specular;
    output.color = vec4<f32>(color.rgb, u.material_diffuse.a);
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return input.color;
}
"#;

pub(crate) const PHONG: &str = r#"
struct LitUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
    normal: mat3x4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    light_position: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    shininess: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: LitUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) eye_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let eye_pos = u.modelview * vec4<f32>(input.position, 1.0);
    output.position = u.projection * eye_pos;
    output.eye_pos = eye_pos.xyz;
    output.normal = normalize(mat3x3<f32>(u.normal[0].xyz, u.normal[1].xyz, u.normal[2].xyz)
        * input.normal);
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.normal);
    let light_dir = normalize(u.light_position.xyz - input.eye_pos);
    let view_dir = normalize(-input.eye_pos);

    let diffuse = max(dot(n, light_dir), 0.0);
    let reflected = reflect(-light_dir, n);
    let specular = pow(max(dot(reflected, view_dir), 0.0), u.shininess.x);

    let color = u.light_ambient * u.material_ambient
        + u.light_diffuse * u.material_diffuse * diffuse
        + u.light_specular * u.material_specular * specular;
    return vec4<f32>(color.rgb, u.material_diffuse.a);
}
"#;

pub(crate) const TOON: &str = r#"
struct ToonUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
    normal: mat3x4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    light_position: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    shininess: vec4<f32>,
    attenuation: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: ToonUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) eye_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let eye_pos = u.modelview * vec4<f32>(input.position, 1.0);
    output.position = u.projection * eye_pos;
    output.eye_pos = eye_pos.xyz;
    output.normal = normalize(mat3x3<f32>(u.normal[0].xyz, u.normal[1].xyz, u.normal[2].xyz)
        * input.normal);
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.normal);
    let to_light = u.light_position.xyz - input.eye_pos;
    let dist = length(to_light);
    let light_dir = to_light / dist;

    let falloff = 1.0 / (u.attenuation.x + u.attenuation.y * dist
        + u.attenuation.z * dist * dist);
    let intensity = max(dot(n, light_dir), 0.0) * falloff;

    // Quantize the diffuse response into flat bands.
    var band = 0.2;
    if (intensity > 0.85) {
        band = 1.0;
    } else if (intensity > 0.5) {
        band = 0.7;
    } else if (intensity > 0.25) {
        band = 0.4;
    }

    let color = u.light_ambient * u.material_ambient
        + u.light_diffuse * u.material_diffuse * band;
    return vec4<f32>(color.rgb, u.material_diffuse.a);
}
"#;

pub(crate) const REFLECTION: &str = r#"
struct EnvUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    camera_position: vec4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    light_position: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    shininess: vec4<f32>,
    attenuation: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: EnvUniforms;

@group(1) @binding(0)
var surface_texture: texture_2d<f32>;
@group(1) @binding(1)
var surface_sampler: sampler;

@group(2) @binding(0)
var env_texture: texture_cube<f32>;
@group(2) @binding(1)
var env_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) eye_pos: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) world_normal: vec3<f32>,
    @location(3) texcoord: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let eye_pos = u.modelview * vec4<f32>(input.position, 1.0);
    output.position = u.projection * eye_pos;
    output.eye_pos = eye_pos.xyz;
    // World-space attributes come from the explicit model matrix so the
    // view vector can be formed against the camera's world position.
    let world_pos = u.model * vec4<f32>(input.position, 1.0);
    output.world_pos = world_pos.xyz;
    output.world_normal = normalize(
        mat3x3<f32>(u.normal[0].xyz, u.normal[1].xyz, u.normal[2].xyz) * input.normal);
    output.texcoord = input.texcoord;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.world_normal);
    let incident = normalize(input.world_pos - u.camera_position.xyz);
    let bounced = reflect(incident, n);
    let env = textureSample(env_texture, env_sampler, bounced);
    let texel = textureSample(surface_texture, surface_sampler, input.texcoord);

    let to_light = u.light_position.xyz - input.eye_pos;
    let dist = length(to_light);
    let falloff = 1.0 / (u.attenuation.x + u.attenuation.y * dist
        + u.attenuation.z * dist * dist);
    let diffuse = max(dot(n, normalize(to_light)), 0.0) * falloff;

    let base = u.light_ambient * u.material_ambient
        + u.light_diffuse * u.material_diffuse * diffuse;
    let color = mix(base.rgb * texel.rgb, env.rgb, 0.7);
    return vec4<f32>(color, u.material_diffuse.a);
}
"#;

pub(crate) const REFRACTION: &str = r#"
struct EnvUniforms {
    projection: mat4x4<f32>,
    modelview: mat4x4<f32>,
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    camera_position: vec4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    light_position: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    shininess: vec4<f32>,
    attenuation: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: EnvUniforms;

@group(1) @binding(0)
var surface_texture: texture_2d<f32>;
@group(1) @binding(1)
var surface_sampler: sampler;

@group(2) @binding(0)
var env_texture: texture_cube<f32>;
@group(2) @binding(1)
var env_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) eye_pos: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) world_normal: vec3<f32>,
    @location(3) texcoord: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let eye_pos = u.modelview * vec4<f32>(input.position, 1.0);
    output.position = u.projection * eye_pos;
    output.eye_pos = eye_pos.xyz;
    let world_pos = u.model * vec4<f32>(input.position, 1.0);
    output.world_pos = world_pos.xyz;
    output.world_normal = normalize(
        mat3x3<f32>(u.normal[0].xyz, u.normal[1].xyz, u.normal[2].xyz) * input.normal);
    output.texcoord = input.texcoord;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.world_normal);
    let incident = normalize(input.world_pos - u.camera_position.xyz);
    // Air-to-glass ratio; close enough for a demo surface.
    let bounced = refract(incident, n, 1.0 / 1.33);
    let env = textureSample(env_texture, env_sampler, bounced);
    let texel = textureSample(surface_texture, surface_sampler, input.texcoord);

    let to_light = u.light_position.xyz - input.eye_pos;
    let dist = length(to_light);
    let falloff = 1.0 / (u.attenuation.x + u.attenuation.y * dist
        + u.attenuation.z * dist * dist);
    let diffuse = max(dot(n, normalize(to_light)), 0.0) * falloff;

    let base = u.light_ambient * u.material_ambient
        + u.light_diffuse * u.material_diffuse * diffuse;
    let color = mix(base.rgb * texel.rgb, env.rgb, 0.7);
    return vec4<f32>(color, u.material_diffuse.a);
}
"#;
