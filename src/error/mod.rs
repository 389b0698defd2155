/*!
 This module defines the errors that can happen when decoding archived data.
*/

pub mod archive;
