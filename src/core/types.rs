/*!
 * Core Types
 * Common types shared across the subscription subsystem
 */

use smartstring::alias::String as SmartString;

/// Family-specific signal discriminant (e.g. a POSIX signal number)
pub type SignalCode = u32;

/// Family tag identifying the signal family a manager serves.
///
/// Tags are short ("UNIX", "TIMER"), so the inline representation
/// avoids a heap allocation per definition.
pub type FamilyTag = SmartString;
