/*!
 Contains logic and data structures used to decode `NSKeyedArchiver` object graphs into native Rust data structures.

 ## Overview

 `NSKeyedArchiver` flattens an `Objective-C` object graph into a binary property list:
 every object in the graph lives in a single flat `$objects` table, and collections
 store UID references into that table instead of inline values. Decoding therefore
 means resolving references and rebuilding the nested structure the archive describes.

 ## Features

 - Recognizes the archived shapes of `NSDictionary`, `NSArray`, `NSSet`, `NSString`, and `NSDate`
 - Detects the `$null` sentinel the archiver uses for absent values
 - Tolerates unknown archived classes, reporting them as unrecognized instead of failing
 - Robust error handling for malformed or inconsistent archive records
*/

pub mod decoder;
pub mod models;
pub mod resolver;
