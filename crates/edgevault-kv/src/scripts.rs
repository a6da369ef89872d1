//! Server-side scripts used by scrub.

/// Unlinks `ARGV[1] .. member` for every member of the sorted set
/// `KEYS[1]` in batches of 4096, then the set itself.
pub const UNLINK_ORDERED: &str = r"
local members = redis.call('ZRANGE', KEYS[1], 0, -1)
for i = 1, #members, 4096 do
  local batch = {}
  for j = i, math.min(i + 4095, #members) do
    batch[#batch + 1] = ARGV[1] .. members[j]
  end
  redis.call('UNLINK', unpack(batch))
end
redis.call('UNLINK', KEYS[1])
return #members
";

/// Unlinks every key starting with `ARGV[1]`.
pub const UNLINK_PREFIXED: &str = r"
local cursor = '0'
local removed = 0
repeat
  local reply = redis.call('SCAN', cursor, 'MATCH', ARGV[1] .. '*', 'COUNT', 1000)
  cursor = reply[1]
  if #reply[2] > 0 then
    removed = removed + redis.call('UNLINK', unpack(reply[2]))
  end
until cursor == '0'
return removed
";
