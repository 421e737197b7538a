// Protocol revision table for Minecraft Bedrock Edition.
//
// Every conditional field in the codec compares the carried protocol id
// against one of these named constants; raw numeric comparisons are never
// written at call sites. Supporting a new revision means adding one entry
// here plus the specific branches that changed.

pub const PROTOCOL_1_12_0: u32 = 361;
pub const PROTOCOL_1_13_0: u32 = 388;
pub const PROTOCOL_1_14_0: u32 = 389;
pub const PROTOCOL_1_16_0: u32 = 407;
pub const PROTOCOL_1_16_100: u32 = 419;
pub const PROTOCOL_1_16_200: u32 = 422;
pub const PROTOCOL_1_16_210: u32 = 428;
pub const PROTOCOL_1_17_0: u32 = 440;
pub const PROTOCOL_1_18_0: u32 = 475;
pub const PROTOCOL_1_19_0: u32 = 527;
pub const PROTOCOL_1_19_20: u32 = 544;
pub const PROTOCOL_1_19_40: u32 = 557;

/// Oldest revision the codec still speaks.
pub const MINIMUM: u32 = PROTOCOL_1_12_0;
/// Newest revision the codec targets.
pub const CURRENT: u32 = PROTOCOL_1_19_40;
