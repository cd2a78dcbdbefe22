//! Detection of shading-language built-in variables referenced by a fragment.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BuiltinBits: u32 {
        const FRAG_COORD             = 1 << 0;
        const FRONT_FACING           = 1 << 1;
        const GLOBAL_INVOCATION_ID   = 1 << 2;
        const INSTANCE_ID            = 1 << 3;
        const LOCAL_INVOCATION_ID    = 1 << 4;
        const LOCAL_INVOCATION_INDEX = 1 << 5;
        const NUM_WORK_GROUP         = 1 << 6;
        const POINT_COORD            = 1 << 7;
        const POINT_SIZE             = 1 << 8;
        const PRIMITIVE_ID           = 1 << 9;
        const VERTEX_ID              = 1 << 10;
        const WORK_GROUP_ID          = 1 << 11;
        const WORK_GROUP_SIZE        = 1 << 12;
    }
}

const BUILTIN_KEYWORDS: &[(&str, BuiltinBits)] = &[
    ("gl_FragCoord", BuiltinBits::FRAG_COORD),
    ("gl_FrontFacing", BuiltinBits::FRONT_FACING),
    ("gl_GlobalInvocationID", BuiltinBits::GLOBAL_INVOCATION_ID),
    ("gl_InstanceID", BuiltinBits::INSTANCE_ID),
    ("gl_LocalInvocationID", BuiltinBits::LOCAL_INVOCATION_ID),
    ("gl_LocalInvocationIndex", BuiltinBits::LOCAL_INVOCATION_INDEX),
    ("gl_NumWorkGroup", BuiltinBits::NUM_WORK_GROUP),
    ("gl_PointCoord", BuiltinBits::POINT_COORD),
    ("gl_PointSize", BuiltinBits::POINT_SIZE),
    ("gl_PrimitiveID", BuiltinBits::PRIMITIVE_ID),
    ("gl_VertexID", BuiltinBits::VERTEX_ID),
    ("gl_WorkGroupID", BuiltinBits::WORK_GROUP_ID),
    ("gl_WorkGroupSize", BuiltinBits::WORK_GROUP_SIZE),
];

/// Plain substring test per keyword.
///
/// Disabled `#if` blocks, comments and longer identifiers all count as usage.
pub fn scan_builtins(text: &str) -> BuiltinBits {
    BUILTIN_KEYWORDS
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .fold(BuiltinBits::empty(), |bits, (_, flag)| bits | *flag)
}

/// Shading-language spelling of every flag set in `bits`.
pub fn builtin_keywords(bits: BuiltinBits) -> Vec<&'static str> {
    BUILTIN_KEYWORDS
        .iter()
        .filter(|(_, flag)| bits.contains(*flag))
        .map(|(keyword, _)| *keyword)
        .collect()
}
